//! Meso resolution by descriptor enumeration.
//!
//! A potential stereocenter is stuck until the centers it depends on carry
//! descriptors. When those are themselves undefined, the only way to find
//! out whether the center could ever become stereogenic is to try every
//! hypothetical assignment: seed each trial's R/S choices as auxiliary
//! descriptors, relabel, and watch which centers resolve. A center no trial
//! can resolve is meso-redundant and will never carry a descriptor.

use std::collections::{HashMap, HashSet};

use log::debug;
use petgraph::graph::NodeIndex;

use crate::labeler::{assign_seeded, atom_parity_resolves, StereoConfig};
use crate::mol::{Descriptor, Mol};
use crate::traits::{HasAtomicNum, HasHydrogenCount, HasIsotope};

/// What enumeration concluded about a set of undefined potential centers.
#[derive(Debug, Clone, Default)]
pub struct MesoOutcome {
    /// Trials actually evaluated; 0 when enumeration was skipped.
    pub trials_run: usize,
    /// True when the center count exceeded the configured bound.
    pub skipped: bool,
    /// Centers no assignment of the others can make stereogenic.
    pub meso_redundant: Vec<NodeIndex>,
    /// Centers some assignment makes stereogenic; they stay undefined
    /// unless `resolved` pins them down.
    pub pseudo_asymmetric: Vec<NodeIndex>,
    /// Pseudo-asymmetric centers with their own geometry whose lowercase
    /// descriptor came out the same in every resolving trial.
    pub resolved: HashMap<NodeIndex, Descriptor>,
}

/// Enumerate hypothetical descriptor assignments over `centers`.
///
/// Centers that already carry a stereo element keep it in every trial and
/// contribute an observed descriptor instead of a free R/S choice, so the
/// trial count is two to the number of geometry-less centers.
pub fn resolve<A, B>(mol: &Mol<A, B>, centers: &[NodeIndex], config: &StereoConfig) -> MesoOutcome
where
    A: HasAtomicNum + HasIsotope + HasHydrogenCount,
{
    if centers.len() > config.max_undefined {
        return MesoOutcome {
            skipped: true,
            ..MesoOutcome::default()
        };
    }

    let (free, with_geometry): (Vec<NodeIndex>, Vec<NodeIndex>) = centers
        .iter()
        .copied()
        .partition(|&c| mol.tetrahedral_for(c).is_none());

    let mut observed: HashSet<NodeIndex> = HashSet::new();
    let mut letters: HashMap<NodeIndex, Vec<Descriptor>> = HashMap::new();
    let mut trials_run = 0usize;

    for bits in 0usize..(1 << free.len()) {
        let mut seed: HashMap<NodeIndex, Descriptor> = HashMap::new();
        for (i, &center) in free.iter().enumerate() {
            let d = if bits & (1 << i) != 0 {
                Descriptor::R
            } else {
                Descriptor::S
            };
            seed.insert(center, d);
        }

        let labels = assign_seeded(mol, false, &seed);
        trials_run += 1;

        let mut aux = seed.clone();
        for (&atom, &d) in &labels.atoms {
            aux.entry(atom).or_insert(d);
        }
        for &center in &free {
            if atom_parity_resolves(mol, center, &aux) {
                observed.insert(center);
            }
        }
        for &center in &with_geometry {
            let d = labels.atoms.get(&center).copied().unwrap_or_default();
            if d.is_defined() {
                observed.insert(center);
                letters.entry(center).or_default().push(base_letter(d));
            }
        }

        // Letter invariance needs the full trial set; short-circuiting is
        // only sound when no center is collecting letters.
        if with_geometry.is_empty() && observed.len() == centers.len() {
            debug!("all {} centers observed after {trials_run} trials", centers.len());
            break;
        }
    }

    let mut resolved = HashMap::new();
    for (&center, seen) in &letters {
        if let Some((&first, rest)) = seen.split_first() {
            if rest.iter().all(|&l| l == first) {
                resolved.insert(
                    center,
                    match first {
                        Descriptor::R => Descriptor::PseudoR,
                        _ => Descriptor::PseudoS,
                    },
                );
            }
        }
    }

    let mut meso_redundant: Vec<NodeIndex> = centers
        .iter()
        .copied()
        .filter(|c| !observed.contains(c))
        .collect();
    meso_redundant.sort();
    let mut pseudo_asymmetric: Vec<NodeIndex> = observed.into_iter().collect();
    pseudo_asymmetric.sort();

    MesoOutcome {
        trials_run,
        skipped: false,
        meso_redundant,
        pseudo_asymmetric,
        resolved,
    }
}

fn base_letter(d: Descriptor) -> Descriptor {
    match d {
        Descriptor::R | Descriptor::PseudoR => Descriptor::R,
        _ => Descriptor::S,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;

    fn ch(atomic_num: u8, hydrogen_count: u8) -> Atom {
        Atom {
            atomic_num,
            hydrogen_count,
            ..Atom::default()
        }
    }

    fn carbon_ring(mol: &mut Mol<Atom, Bond>, size: usize, hydrogens: u8) -> Vec<NodeIndex> {
        let atoms: Vec<NodeIndex> = (0..size).map(|_| mol.add_atom(ch(6, hydrogens))).collect();
        for i in 0..size {
            mol.add_bond(atoms[i], atoms[(i + 1) % size], Bond::default());
        }
        atoms
    }

    #[test]
    fn over_budget_is_skipped_without_trials() {
        let mut mol = Mol::<Atom, Bond>::new();
        let ring = carbon_ring(&mut mol, 6, 1);
        let config = StereoConfig {
            max_undefined: 5,
            ..StereoConfig::default()
        };
        let outcome = resolve(&mol, &ring, &config);
        assert!(outcome.skipped);
        assert_eq!(outcome.trials_run, 0);
        assert!(outcome.meso_redundant.is_empty());
        assert!(outcome.pseudo_asymmetric.is_empty());
    }

    #[test]
    fn mirror_symmetric_pair_is_meso_redundant() {
        // 1,3-difluorocyclobutane: each substituted corner sees the other
        // through two identical paths, so no assignment of one can break
        // the tie at the other.
        let mut mol = Mol::<Atom, Bond>::new();
        let ring = carbon_ring(&mut mol, 4, 2);
        for &c in &[ring[0], ring[2]] {
            mol.atom_mut(c).hydrogen_count = 1;
            let f = mol.add_atom(ch(9, 0));
            mol.add_bond(c, f, Bond::default());
        }
        let centers = vec![ring[0], ring[2]];
        let outcome = resolve(&mol, &centers, &StereoConfig::default());
        assert!(!outcome.skipped);
        assert_eq!(outcome.meso_redundant, centers);
        assert!(outcome.pseudo_asymmetric.is_empty());
        assert_eq!(outcome.trials_run, 4);
    }

    #[test]
    fn interdependent_ring_centers_are_observed() {
        // Pentafluorocyclopentane: every corner's two ring branches tie
        // until neighboring corners carry distinct descriptors.
        let mut mol = Mol::<Atom, Bond>::new();
        let ring = carbon_ring(&mut mol, 5, 1);
        for &c in &ring {
            let f = mol.add_atom(ch(9, 0));
            mol.add_bond(c, f, Bond::default());
        }
        let outcome = resolve(&mol, &ring, &StereoConfig::default());
        assert!(!outcome.skipped);
        assert!(outcome.meso_redundant.is_empty());
        let mut expected = ring.clone();
        expected.sort();
        assert_eq!(outcome.pseudo_asymmetric, expected);
        // Short-circuits once every center has been observed.
        assert!(outcome.trials_run >= 2 && outcome.trials_run <= 32);
    }
}
