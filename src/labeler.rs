//! CIP labeling orchestration.
//!
//! `label` drives the whole pipeline: ring perception, precise/fast
//! dispatch, descriptor assignment to a fixed point, stereocenter
//! classification, and meso resolution. Chemistry ambiguity always lands in
//! a well-defined "undefined" descriptor; the only hard error is a stereo
//! element referencing topology that does not exist.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::bond::BondOrder;
use crate::classify::{classify_with, StereocenterCategory};
use crate::ligand::{compare, constitutional_compare, permutation_parity_by, Ligand, Parity};
use crate::meso;
use crate::mol::{
    AtomId, BondDescriptor, Conformation, Descriptor, Mol, StereoElement, StereoLabels, Winding,
};
use crate::ring_system::largest_ring_system;
use crate::rings::RingFlags;
use crate::traits::{
    HasAromaticity, HasAtomicNum, HasAtomicNumMut, HasBondOrder, HasBondOrderMut,
    HasFormalCharge, HasHydrogenCount, HasIsotope,
};

/// Tunables of a labeling pass. Explicit per-call configuration; there is
/// no process-wide state to mutate.
#[derive(Debug, Clone)]
pub struct StereoConfig {
    /// Largest fused-ring-system rank still labeled on the precise path.
    pub ring_system_threshold: usize,
    /// Above this many undefined potential centers, meso enumeration is
    /// skipped and all of them stay undefined.
    pub max_undefined: usize,
}

impl Default for StereoConfig {
    fn default() -> Self {
        Self {
            ring_system_threshold: 5,
            max_undefined: 5,
        }
    }
}

/// Hard failures: the graph itself is unusable for labeling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StereoError {
    DanglingAtom { atom: usize },
    DanglingBond { bond: usize },
    FocusAmongLigands { atom: usize },
}

impl std::fmt::Display for StereoError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DanglingAtom { atom } => {
                write!(f, "stereo element references nonexistent atom {atom}")
            }
            Self::DanglingBond { bond } => {
                write!(f, "stereo element references nonexistent bond {bond}")
            }
            Self::FocusAmongLigands { atom } => {
                write!(f, "atom {atom} appears in its own ligand array")
            }
        }
    }
}

impl std::error::Error for StereoError {}

/// Non-fatal events of a labeling pass, aggregated instead of thrown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// Atom had no usable atomic number; a placeholder was substituted for
    /// the duration of the pass.
    PatchedAtomicNum { atom: NodeIndex },
    /// Bond order was unset (and not aromatic); treated as single for the
    /// duration of the pass.
    PatchedBondOrder { bond: EdgeIndex },
    /// Ring system rank exceeded the threshold; the fast path was used.
    FastPath { rank: usize },
    /// Too many undefined potential centers; enumeration skipped.
    EnumerationSkipped { undefined: usize },
}

pub type Diagnostics = Vec<Diagnostic>;

/// Descriptor ceiling for the auxiliary-relabeling loop. Two passes settle
/// almost everything; the extra headroom covers nested pseudo-asymmetry.
const MAX_PASSES: usize = 4;

/// Assign CIP descriptors to every perceived stereo element and stereocenter
/// of `mol`, writing the label map onto the molecule.
pub fn label<A, B>(mol: &mut Mol<A, B>, config: &StereoConfig) -> Result<Diagnostics, StereoError>
where
    A: HasAtomicNum + HasAtomicNumMut + HasIsotope + HasHydrogenCount + HasFormalCharge,
    B: HasBondOrder + HasBondOrderMut + HasAromaticity,
{
    validate_elements(mol)?;
    let mut diags = Diagnostics::new();

    // Query atoms are excluded as stereocenter foci even while patched.
    let query_atoms: HashSet<NodeIndex> = mol
        .atoms()
        .filter(|&a| mol.atom(a).atomic_num() == 0)
        .collect();

    let patches = apply_patches(mol, &mut diags);
    let result = label_inner(mol, config, &query_atoms, &mut diags);
    // The patch must come off on every exit path, success or not.
    restore_patches(mol, patches);

    let labels = result?;
    mol.set_labels(labels);
    Ok(diags)
}

fn label_inner<A, B>(
    mol: &Mol<A, B>,
    config: &StereoConfig,
    query_atoms: &HashSet<NodeIndex>,
    diags: &mut Diagnostics,
) -> Result<StereoLabels, StereoError>
where
    A: HasAtomicNum + HasIsotope + HasHydrogenCount + HasFormalCharge,
    B: HasBondOrder + HasAromaticity,
{
    let flags = RingFlags::perceive(mol);
    let rank = largest_ring_system(mol, &flags);
    let fast = rank > config.ring_system_threshold;
    if fast {
        warn!(
            "ring system rank {rank} exceeds threshold {}; using fast path",
            config.ring_system_threshold
        );
        diags.push(Diagnostic::FastPath { rank });
    }

    let mut labels = assign_to_fixed_point(mol, fast);

    let categories = classify_with(mol, &flags, fast, query_atoms);
    for (&atom, &category) in &categories {
        match category {
            StereocenterCategory::Non => {
                // A perceived element's own label wins; the classifier
                // only fills atoms that carried no element.
                labels.atoms.entry(atom).or_insert(Descriptor::NonChiral);
            }
            StereocenterCategory::True => {
                // Real center without assigned geometry stays undefined.
                labels.atoms.entry(atom).or_insert(Descriptor::Either);
            }
            StereocenterCategory::Potential => {}
        }
    }

    let undefined_potential: Vec<NodeIndex> = {
        let mut u: Vec<NodeIndex> = categories
            .iter()
            .filter(|(_, &c)| c == StereocenterCategory::Potential)
            .map(|(&a, _)| a)
            .filter(|a| !labels.atoms.get(a).map_or(false, |d| d.is_defined()))
            .collect();
        u.sort();
        u
    };

    if !undefined_potential.is_empty() {
        let outcome = meso::resolve(mol, &undefined_potential, config);
        if outcome.skipped {
            debug!(
                "skipping meso enumeration over {} centers",
                undefined_potential.len()
            );
            diags.push(Diagnostic::EnumerationSkipped {
                undefined: undefined_potential.len(),
            });
            // Enumeration bound exceeded: every candidate stays undefined.
            for &atom in &undefined_potential {
                labels.atoms.insert(atom, Descriptor::Either);
            }
        }
        for &atom in &outcome.meso_redundant {
            labels.atoms.insert(atom, Descriptor::NonChiral);
        }
        for &atom in &outcome.pseudo_asymmetric {
            labels.atoms.insert(atom, Descriptor::Either);
        }
        for (&atom, &d) in &outcome.resolved {
            labels.atoms.insert(atom, d);
        }
    }

    Ok(labels)
}

/// Run descriptor assignment repeatedly, feeding each pass's descriptors
/// back as auxiliary ranks, until the map stops changing.
pub(crate) fn assign_to_fixed_point<A, B>(mol: &Mol<A, B>, fast: bool) -> StereoLabels
where
    A: HasAtomicNum + HasIsotope + HasHydrogenCount,
{
    assign_seeded(mol, fast, &HashMap::new())
}

/// Fixed-point assignment with externally imposed auxiliary descriptors.
/// `seed` entries take precedence over descriptors computed along the way;
/// meso enumeration uses this to test hypothetical configurations without
/// touching the molecule.
pub(crate) fn assign_seeded<A, B>(
    mol: &Mol<A, B>,
    fast: bool,
    seed: &HashMap<NodeIndex, Descriptor>,
) -> StereoLabels
where
    A: HasAtomicNum + HasIsotope + HasHydrogenCount,
{
    let mut labels = StereoLabels::default();
    for _ in 0..MAX_PASSES {
        let mut aux = seed.clone();
        for (&atom, &d) in &labels.atoms {
            aux.entry(atom).or_insert(d);
        }
        let next = assign_once(mol, fast, &aux);
        if next == labels {
            break;
        }
        labels = next;
    }
    labels
}

/// Whether the slots around a bare atom (no stereo element required) can be
/// put in a strict priority order under the given auxiliary descriptors.
pub(crate) fn atom_parity_resolves<A, B>(
    mol: &Mol<A, B>,
    atom: NodeIndex,
    aux: &HashMap<NodeIndex, Descriptor>,
) -> bool
where
    A: HasAtomicNum + HasIsotope + HasHydrogenCount,
{
    let mut slots: Vec<AtomId> = mol.neighbors(atom).map(AtomId::Node).collect();
    for h in 0..mol.atom(atom).hydrogen_count() {
        slots.push(AtomId::VirtualH(atom, h));
    }
    let (parity, _) = slot_parity(mol, atom, &slots, false, aux);
    !parity.is_tied()
}

fn assign_once<A, B>(
    mol: &Mol<A, B>,
    fast: bool,
    aux: &HashMap<NodeIndex, Descriptor>,
) -> StereoLabels
where
    A: HasAtomicNum + HasIsotope + HasHydrogenCount,
{
    let mut labels = StereoLabels::default();
    for element in mol.stereo_elements() {
        match *element {
            StereoElement::Tetrahedral {
                focus,
                ligands,
                winding,
            } => {
                let (parity, pseudo) = slot_parity(mol, focus, &ligands, fast, aux);
                labels
                    .atoms
                    .insert(focus, tetrahedral_descriptor(parity, winding, pseudo));
            }
            StereoElement::ExtendedTetrahedral {
                focus,
                terminals,
                peripherals,
                winding,
            } => {
                let (pa, pseudo_a) = slot_parity(mol, terminals[0], &peripherals[..2], fast, aux);
                let (pb, pseudo_b) = slot_parity(mol, terminals[1], &peripherals[2..], fast, aux);
                labels.atoms.insert(
                    focus,
                    tetrahedral_descriptor(pa.combine(pb), winding, pseudo_a || pseudo_b),
                );
            }
            StereoElement::DoubleBond {
                bond,
                side_a,
                side_b,
                conformation,
            } => {
                let descriptor = match mol.bond_endpoints(bond) {
                    Some((u, v)) => {
                        let (pa, _) = slot_parity(mol, u, &side_a, fast, aux);
                        let (pb, _) = slot_parity(mol, v, &side_b, fast, aux);
                        double_bond_descriptor(pa.combine(pb), conformation)
                    }
                    None => BondDescriptor::None,
                };
                labels.bonds.insert(bond, descriptor);
            }
        }
    }
    labels
}

/// Priority parity of the slots around `focus`, plus whether the ordering
/// needed auxiliary descriptors to resolve. The second flag is what turns
/// R/S into r/s.
fn slot_parity<A, B>(
    mol: &Mol<A, B>,
    focus: NodeIndex,
    slots: &[AtomId],
    fast: bool,
    aux: &HashMap<NodeIndex, Descriptor>,
) -> (Parity, bool)
where
    A: HasAtomicNum + HasIsotope + HasHydrogenCount,
{
    let ligands: Vec<Ligand> = slots
        .iter()
        .map(|&slot| {
            if fast {
                Ligand::shallow(mol, slot)
            } else {
                Ligand::build(mol, focus, slot, aux)
            }
        })
        .collect();
    let constitutional = permutation_parity_by(&mut ligands.clone(), constitutional_compare);
    if !constitutional.is_tied() {
        return (constitutional, false);
    }
    let full = permutation_parity_by(&mut ligands.clone(), compare);
    (full, !full.is_tied())
}

fn tetrahedral_descriptor(parity: Parity, winding: Winding, pseudo: bool) -> Descriptor {
    let effective = match parity {
        Parity::Tied => return Descriptor::Either,
        Parity::Even => winding,
        Parity::Odd => winding.inverted(),
    };
    match (effective, pseudo) {
        (Winding::Cw, false) => Descriptor::R,
        (Winding::Ccw, false) => Descriptor::S,
        (Winding::Cw, true) => Descriptor::PseudoR,
        (Winding::Ccw, true) => Descriptor::PseudoS,
    }
}

fn double_bond_descriptor(parity: Parity, conformation: Conformation) -> BondDescriptor {
    let effective = match parity {
        Parity::Tied => return BondDescriptor::None,
        Parity::Even => conformation,
        Parity::Odd => conformation.inverted(),
    };
    match effective {
        Conformation::Together => BondDescriptor::Z,
        Conformation::Opposite => BondDescriptor::E,
    }
}

fn validate_elements<A, B>(mol: &Mol<A, B>) -> Result<(), StereoError> {
    let n = mol.atom_count();
    let check_id = |id: AtomId| -> Result<NodeIndex, StereoError> {
        let node = match id {
            AtomId::Node(x) | AtomId::VirtualH(x, _) => x,
        };
        if node.index() >= n {
            Err(StereoError::DanglingAtom { atom: node.index() })
        } else {
            Ok(node)
        }
    };
    for element in mol.stereo_elements() {
        match *element {
            StereoElement::Tetrahedral { focus, ligands, .. } => {
                if focus.index() >= n {
                    return Err(StereoError::DanglingAtom { atom: focus.index() });
                }
                for id in ligands {
                    if check_id(id)? == focus && matches!(id, AtomId::Node(_)) {
                        return Err(StereoError::FocusAmongLigands { atom: focus.index() });
                    }
                }
            }
            StereoElement::ExtendedTetrahedral {
                focus,
                terminals,
                peripherals,
                ..
            } => {
                for node in [focus, terminals[0], terminals[1]] {
                    if node.index() >= n {
                        return Err(StereoError::DanglingAtom { atom: node.index() });
                    }
                }
                for id in peripherals {
                    if check_id(id)? == focus && matches!(id, AtomId::Node(_)) {
                        return Err(StereoError::FocusAmongLigands { atom: focus.index() });
                    }
                }
            }
            StereoElement::DoubleBond {
                bond,
                side_a,
                side_b,
                ..
            } => {
                if mol.bond_endpoints(bond).is_none() {
                    return Err(StereoError::DanglingBond { bond: bond.index() });
                }
                for id in side_a.iter().chain(side_b.iter()) {
                    check_id(*id)?;
                }
            }
        }
    }
    Ok(())
}

struct Patches {
    atoms: Vec<(NodeIndex, u8)>,
    bonds: Vec<(EdgeIndex, BondOrder)>,
}

/// Atomic number used while an atom's real one is missing: a noble gas
/// nothing bonds to, so it cannot masquerade as a real priority winner.
const PLACEHOLDER_ATOMIC_NUM: u8 = 2;

fn apply_patches<A, B>(mol: &mut Mol<A, B>, diags: &mut Diagnostics) -> Patches
where
    A: HasAtomicNum + HasAtomicNumMut,
    B: HasBondOrder + HasBondOrderMut + HasAromaticity,
{
    let mut patches = Patches {
        atoms: Vec::new(),
        bonds: Vec::new(),
    };
    for atom in mol.atoms().collect::<Vec<_>>() {
        if mol.atom(atom).atomic_num() == 0 {
            debug!("patching missing atomic number on atom {}", atom.index());
            patches.atoms.push((atom, 0));
            *mol.atom_mut(atom).atomic_num_mut() = PLACEHOLDER_ATOMIC_NUM;
            diags.push(Diagnostic::PatchedAtomicNum { atom });
        }
    }
    for bond in mol.bonds().collect::<Vec<_>>() {
        let b = mol.bond(bond);
        if b.bond_order() == BondOrder::Unset && !b.is_aromatic() {
            debug!("patching unset bond order on bond {}", bond.index());
            patches.bonds.push((bond, BondOrder::Unset));
            *mol.bond_mut(bond).bond_order_mut() = BondOrder::Single;
            diags.push(Diagnostic::PatchedBondOrder { bond });
        }
    }
    patches
}

fn restore_patches<A, B>(mol: &mut Mol<A, B>, patches: Patches)
where
    A: HasAtomicNumMut,
    B: HasBondOrderMut,
{
    for (atom, original) in patches.atoms {
        *mol.atom_mut(atom).atomic_num_mut() = original;
    }
    for (bond, original) in patches.bonds {
        *mol.bond_mut(bond).bond_order_mut() = original;
    }
}
