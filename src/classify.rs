//! Stereocenter classification.
//!
//! Decides, per atom, whether it is a genuine tetrahedral stereocenter, a
//! potential one whose status depends on descriptors elsewhere, or not a
//! stereocenter at all. Classification is purely constitutional; it never
//! looks at wedges or coordinates.

use std::collections::{HashMap, HashSet};

use petgraph::graph::NodeIndex;

use crate::bond::BondOrder;
use crate::labeler::StereoConfig;
use crate::ligand::{permutation_parity, Ligand, Parity};
use crate::mol::{AtomId, Mol};
use crate::ring_system::largest_ring_system;
use crate::rings::RingFlags;
use crate::traits::{
    HasAromaticity, HasAtomicNum, HasBondOrder, HasFormalCharge, HasHydrogenCount, HasIsotope,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StereocenterCategory {
    /// Cannot be a stereocenter under any assignment of the others.
    Non,
    /// Stereogenic regardless of any other center.
    True,
    /// Top-level ligand tie inside a ring: whether it is stereogenic
    /// depends on descriptors assigned elsewhere.
    Potential,
}

/// Classify every non-query atom of `mol`.
pub fn classify<A, B>(
    mol: &Mol<A, B>,
    config: &StereoConfig,
) -> HashMap<NodeIndex, StereocenterCategory>
where
    A: HasAtomicNum + HasIsotope + HasHydrogenCount + HasFormalCharge,
    B: HasBondOrder + HasAromaticity,
{
    let flags = RingFlags::perceive(mol);
    let fast = largest_ring_system(mol, &flags) > config.ring_system_threshold;
    let query_atoms: HashSet<NodeIndex> = mol
        .atoms()
        .filter(|&a| mol.atom(a).atomic_num() == 0)
        .collect();
    classify_with(mol, &flags, fast, &query_atoms)
}

pub(crate) fn classify_with<A, B>(
    mol: &Mol<A, B>,
    flags: &RingFlags,
    fast: bool,
    exclude: &HashSet<NodeIndex>,
) -> HashMap<NodeIndex, StereocenterCategory>
where
    A: HasAtomicNum + HasIsotope + HasHydrogenCount + HasFormalCharge,
    B: HasBondOrder + HasAromaticity,
{
    let mut out = HashMap::new();
    for atom in mol.atoms() {
        if exclude.contains(&atom) {
            continue;
        }
        out.insert(atom, classify_atom(mol, flags, fast, atom));
    }
    out
}

fn classify_atom<A, B>(
    mol: &Mol<A, B>,
    flags: &RingFlags,
    fast: bool,
    atom: NodeIndex,
) -> StereocenterCategory
where
    A: HasAtomicNum + HasIsotope + HasHydrogenCount + HasFormalCharge,
    B: HasBondOrder + HasAromaticity,
{
    // Tetrahedral analysis only applies to saturated centers.
    for edge in mol.bonds_of(atom) {
        let bond = mol.bond(edge);
        let single = !bond.is_aromatic()
            && matches!(bond.bond_order(), BondOrder::Single | BondOrder::Unset);
        if !single {
            return StereocenterCategory::Non;
        }
    }

    // Neutral nitrogen inverts too quickly to hold a configuration.
    let payload = mol.atom(atom);
    if payload.atomic_num() == 7 && payload.formal_charge() == 0 {
        return StereocenterCategory::Non;
    }

    // Two implicit hydrogens tie unconditionally; no descriptor elsewhere
    // can ever separate them.
    if payload.hydrogen_count() >= 2 {
        return StereocenterCategory::Non;
    }

    let mut slots: Vec<AtomId> = mol.neighbors(atom).map(AtomId::Node).collect();
    for h in 0..payload.hydrogen_count() {
        slots.push(AtomId::VirtualH(atom, h));
    }
    if slots.len() != 4 {
        return StereocenterCategory::Non;
    }

    let aux = HashMap::new();
    let mut ligands: Vec<Ligand> = slots
        .iter()
        .map(|&slot| {
            if fast {
                Ligand::shallow(mol, slot)
            } else {
                Ligand::build(mol, atom, slot, &aux)
            }
        })
        .collect();
    match permutation_parity(&mut ligands) {
        Parity::Even | Parity::Odd => StereocenterCategory::True,
        Parity::Tied if flags.is_ring_atom(atom) => StereocenterCategory::Potential,
        Parity::Tied => StereocenterCategory::Non,
    }
}
