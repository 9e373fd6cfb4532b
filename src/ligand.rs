//! Ligand trees and CIP priority comparison.
//!
//! A ligand is the substituent subtree rooted at one neighbor of a
//! stereocenter, expanded away from the center. Ring closures terminate in
//! duplicate leaves so the tree is always finite; each traversal owns its
//! own visited set, so separate comparisons never interfere.

use std::cmp::Ordering;
use std::collections::HashMap;

use petgraph::graph::NodeIndex;

use crate::element::standard_atomic_weight;
use crate::mol::{AtomId, Descriptor, Mol};
use crate::traits::{HasAtomicNum, HasHydrogenCount, HasIsotope};

/// One node of a substituent subtree.
#[derive(Debug, Clone)]
pub struct Ligand {
    atomic_num: u8,
    mass: f64,
    /// Rank derived from the atom's currently cached descriptor; the
    /// second comparison stage consults it as a last-resort tie-break.
    aux_rank: u8,
    /// True for a ring-closure leaf: atomic number and mass only, never
    /// expanded further.
    duplicate: bool,
    children: Vec<Ligand>,
}

impl Ligand {
    /// Build the ligand rooted at `root`, seen from `focus`.
    ///
    /// `aux` carries descriptors from an earlier labeling pass (empty on
    /// the first pass). The traversal's visited set is seeded with the
    /// focus, so a path that loops back to it closes as a duplicate leaf
    /// like any other ring closure.
    pub fn build<A, B>(
        mol: &Mol<A, B>,
        focus: NodeIndex,
        root: AtomId,
        aux: &HashMap<NodeIndex, Descriptor>,
    ) -> Ligand
    where
        A: HasAtomicNum + HasIsotope + HasHydrogenCount,
    {
        match root {
            AtomId::VirtualH(..) => Ligand::hydrogen(),
            AtomId::Node(node) => {
                let mut visited = vec![false; mol.atom_count()];
                visited[focus.index()] = true;
                visited[node.index()] = true;
                let mut ligand = Ligand::interior(mol, node, aux);
                ligand.children = expand(mol, node, &mut visited, aux);
                ligand.normalize();
                ligand
            }
        }
    }

    fn interior<A, B>(
        mol: &Mol<A, B>,
        node: NodeIndex,
        aux: &HashMap<NodeIndex, Descriptor>,
    ) -> Ligand
    where
        A: HasAtomicNum + HasIsotope,
    {
        let atom = mol.atom(node);
        Ligand {
            atomic_num: atom.atomic_num(),
            mass: effective_mass(atom.atomic_num(), atom.isotope()),
            aux_rank: aux.get(&node).map_or(0, |d| descriptor_rank(*d)),
            duplicate: false,
            children: Vec::new(),
        }
    }

    fn duplicate_of<A, B>(mol: &Mol<A, B>, node: NodeIndex) -> Ligand
    where
        A: HasAtomicNum + HasIsotope,
    {
        let atom = mol.atom(node);
        Ligand {
            atomic_num: atom.atomic_num(),
            mass: effective_mass(atom.atomic_num(), atom.isotope()),
            aux_rank: 0,
            duplicate: true,
            children: Vec::new(),
        }
    }

    /// Single-atom ligand for the fast path: element and mass of the slot
    /// atom only, no subtree.
    pub fn shallow<A, B>(mol: &Mol<A, B>, root: AtomId) -> Ligand
    where
        A: HasAtomicNum + HasIsotope,
    {
        match root {
            AtomId::VirtualH(..) => Ligand::hydrogen(),
            AtomId::Node(node) => {
                let atom = mol.atom(node);
                Ligand {
                    atomic_num: atom.atomic_num(),
                    mass: effective_mass(atom.atomic_num(), atom.isotope()),
                    aux_rank: 0,
                    duplicate: false,
                    children: Vec::new(),
                }
            }
        }
    }

    fn hydrogen() -> Ligand {
        Ligand {
            atomic_num: 1,
            mass: standard_atomic_weight(1),
            aux_rank: 0,
            duplicate: false,
            children: Vec::new(),
        }
    }

    pub fn atomic_num(&self) -> u8 {
        self.atomic_num
    }

    pub fn is_duplicate(&self) -> bool {
        self.duplicate
    }

    /// Sort every child list into descending CIP order, deepest level
    /// first, using the full comparator. A partial pre-sort (atomic number
    /// or mass only) is not equivalent: equal-element children can differ
    /// arbitrarily deep, and comparing them in an unsorted order changes
    /// the outcome.
    fn normalize(&mut self) {
        for child in &mut self.children {
            child.normalize();
        }
        self.children.sort_by(|a, b| compare(b, a));
    }
}

fn expand<A, B>(
    mol: &Mol<A, B>,
    at: NodeIndex,
    visited: &mut Vec<bool>,
    aux: &HashMap<NodeIndex, Descriptor>,
) -> Vec<Ligand>
where
    A: HasAtomicNum + HasIsotope + HasHydrogenCount,
{
    let mut children = Vec::new();
    let neighbors: Vec<NodeIndex> = mol.neighbors(at).collect();
    for nb in neighbors {
        if visited[nb.index()] {
            children.push(Ligand::duplicate_of(mol, nb));
        } else {
            visited[nb.index()] = true;
            let mut child = Ligand::interior(mol, nb, aux);
            child.children = expand(mol, nb, visited, aux);
            children.push(child);
        }
    }
    for _ in 0..mol.atom(at).hydrogen_count() {
        children.push(Ligand::hydrogen());
    }
    children
}

fn effective_mass(atomic_num: u8, isotope: u16) -> f64 {
    if isotope != 0 {
        isotope as f64
    } else {
        standard_atomic_weight(atomic_num)
    }
}

fn descriptor_rank(d: Descriptor) -> u8 {
    match d {
        Descriptor::R => 4,
        Descriptor::S => 3,
        Descriptor::PseudoR => 2,
        Descriptor::PseudoS => 1,
        _ => 0,
    }
}

/// Full CIP priority comparison: `Greater` means `a` outranks `b`.
///
/// Two stages: the purely constitutional comparison first, and only if the
/// whole trees tie, a second walk that also consults the auxiliary
/// descriptor ranks. Keeping the stages separate preserves the rule
/// hierarchy (all constitutional spheres before any descriptor).
pub fn compare(a: &Ligand, b: &Ligand) -> Ordering {
    match constitutional_compare(a, b) {
        Ordering::Equal => cmp_tree(a, b, true),
        decided => decided,
    }
}

/// First stage only: the comparison with auxiliary descriptors masked out.
/// A center whose ligands tie here but not under `compare` is
/// pseudo-asymmetric and earns a lowercase descriptor.
pub fn constitutional_compare(a: &Ligand, b: &Ligand) -> Ordering {
    cmp_tree(a, b, false)
}

fn cmp_tree(a: &Ligand, b: &Ligand, with_aux: bool) -> Ordering {
    let by_atom = a
        .atomic_num
        .cmp(&b.atomic_num)
        .then_with(|| a.mass.total_cmp(&b.mass));
    if by_atom != Ordering::Equal {
        return by_atom;
    }
    if with_aux {
        let by_aux = a.aux_rank.cmp(&b.aux_rank);
        if by_aux != Ordering::Equal {
            return by_aux;
        }
    }
    // Child lists are in canonical descending order (normalize ran at
    // build time); pairwise, most significant first.
    for (ca, cb) in a.children.iter().zip(b.children.iter()) {
        let c = cmp_tree(ca, cb, with_aux);
        if c != Ordering::Equal {
            return c;
        }
    }
    // More substituents wins where the shorter list runs out.
    a.children.len().cmp(&b.children.len())
}

/// Outcome of sorting a ligand list into priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parity {
    Even,
    Odd,
    /// Two ligands compared equal: the ordering is ambiguous and the whole
    /// parity computation is poisoned.
    Tied,
}

impl Parity {
    pub fn is_tied(self) -> bool {
        self == Parity::Tied
    }

    /// Sign product of two parities; any tied factor poisons the product.
    pub fn combine(self, other: Parity) -> Parity {
        match (self, other) {
            (Parity::Tied, _) | (_, Parity::Tied) => Parity::Tied,
            (Parity::Even, Parity::Even) | (Parity::Odd, Parity::Odd) => Parity::Even,
            _ => Parity::Odd,
        }
    }
}

/// Insertion-sort `ligands` into descending priority order, counting the
/// adjacent swaps. Aborts with `Tied` the moment any comparison during the
/// sort returns equal.
pub fn permutation_parity(ligands: &mut [Ligand]) -> Parity {
    permutation_parity_by(ligands, compare)
}

/// `permutation_parity` under an explicit comparator.
pub fn permutation_parity_by(
    ligands: &mut [Ligand],
    cmp: impl Fn(&Ligand, &Ligand) -> Ordering,
) -> Parity {
    let mut swaps = 0usize;
    for i in 1..ligands.len() {
        let mut j = i;
        while j > 0 {
            match cmp(&ligands[j - 1], &ligands[j]) {
                Ordering::Equal => return Parity::Tied,
                Ordering::Less => {
                    ligands.swap(j - 1, j);
                    swaps += 1;
                    j -= 1;
                }
                Ordering::Greater => break,
            }
        }
    }
    if swaps % 2 == 0 {
        Parity::Even
    } else {
        Parity::Odd
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;

    fn atom(atomic_num: u8) -> Atom {
        Atom {
            atomic_num,
            ..Atom::default()
        }
    }

    fn leaf(atomic_num: u8) -> Ligand {
        Ligand {
            atomic_num,
            mass: standard_atomic_weight(atomic_num),
            aux_rank: 0,
            duplicate: false,
            children: Vec::new(),
        }
    }

    fn with_children(atomic_num: u8, children: Vec<Ligand>) -> Ligand {
        let mut lig = Ligand {
            children,
            ..leaf(atomic_num)
        };
        lig.normalize();
        lig
    }

    #[test]
    fn atomic_number_decides_first() {
        assert_eq!(compare(&leaf(9), &leaf(6)), Ordering::Greater);
        assert_eq!(compare(&leaf(6), &leaf(7)), Ordering::Less);
    }

    #[test]
    fn isotope_breaks_element_tie() {
        let mut deuterium = leaf(1);
        deuterium.mass = 2.0;
        assert_eq!(compare(&deuterium, &leaf(1)), Ordering::Greater);
    }

    #[test]
    fn deep_difference_decides() {
        // C(->O) vs C(->N): oxygen outranks nitrogen one sphere down.
        let a = with_children(6, vec![leaf(8)]);
        let b = with_children(6, vec![leaf(7)]);
        assert_eq!(compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn more_substituents_wins_on_exhaustion() {
        let a = with_children(6, vec![leaf(6), leaf(6)]);
        let b = with_children(6, vec![leaf(6)]);
        assert_eq!(compare(&a, &b), Ordering::Greater);
    }

    #[test]
    fn child_order_is_canonical_not_input_order() {
        // Same child multiset presented in opposite input orders must
        // compare equal; with only an atomic-number pre-sort the two
        // carbon children would be compared in arbitrary order and the
        // trees would wrongly differ.
        let a = with_children(
            6,
            vec![with_children(6, vec![leaf(8)]), with_children(6, vec![leaf(7)])],
        );
        let b = with_children(
            6,
            vec![with_children(6, vec![leaf(7)]), with_children(6, vec![leaf(8)])],
        );
        assert_eq!(compare(&a, &b), Ordering::Equal);
    }

    #[test]
    fn canonical_order_compares_most_significant_first() {
        let a = with_children(
            6,
            vec![with_children(6, vec![leaf(8)]), with_children(6, vec![leaf(7)])],
        );
        let b = with_children(
            6,
            vec![with_children(6, vec![leaf(9)]), with_children(6, vec![leaf(7)])],
        );
        // F-bearing branch outranks the O-bearing one.
        assert_eq!(compare(&a, &b), Ordering::Less);
    }

    #[test]
    fn parity_even_and_odd() {
        // Br, Cl, F, H already descending: zero swaps.
        let mut sorted = vec![leaf(35), leaf(17), leaf(9), leaf(1)];
        assert_eq!(permutation_parity(&mut sorted), Parity::Even);

        // One adjacent swap needed.
        let mut one_swap = vec![leaf(17), leaf(35), leaf(9), leaf(1)];
        assert_eq!(permutation_parity(&mut one_swap), Parity::Odd);

        // Reversed four-element list: six swaps, even.
        let mut reversed = vec![leaf(1), leaf(9), leaf(17), leaf(35)];
        assert_eq!(permutation_parity(&mut reversed), Parity::Even);
    }

    #[test]
    fn parity_tie_poisons() {
        let mut tied = vec![leaf(35), leaf(9), leaf(9), leaf(1)];
        assert_eq!(permutation_parity(&mut tied), Parity::Tied);
        // Ties are detected even when the equal pair starts out separated.
        let mut separated = vec![leaf(9), leaf(35), leaf(9), leaf(1)];
        assert_eq!(permutation_parity(&mut separated), Parity::Tied);
    }

    #[test]
    fn ring_closure_becomes_duplicate_leaf() {
        // Cyclopropane: from one corner, each ligand loops back to the
        // focus; the closure must terminate as a duplicate, not recurse.
        let mut mol = Mol::<Atom, Bond>::new();
        let a = mol.add_atom(atom(6));
        let b = mol.add_atom(atom(6));
        let c = mol.add_atom(atom(6));
        mol.add_bond(a, b, Bond::default());
        mol.add_bond(b, c, Bond::default());
        mol.add_bond(c, a, Bond::default());

        let aux = HashMap::new();
        let lig = Ligand::build(&mol, a, AtomId::Node(b), &aux);
        assert_eq!(lig.atomic_num(), 6);
        // b's non-hydrogen child is c, whose only child is the closure
        // back to a.
        let ring_child = lig
            .children
            .iter()
            .find(|l| l.atomic_num() == 6 && !l.is_duplicate())
            .expect("ring branch");
        let closure = ring_child
            .children
            .iter()
            .find(|l| l.atomic_num() == 6)
            .expect("closure leaf");
        assert!(closure.is_duplicate());
        assert!(closure.children.is_empty());
    }

    #[test]
    fn aux_rank_only_breaks_full_ties() {
        let mut a = with_children(6, vec![leaf(8)]);
        let mut b = with_children(6, vec![leaf(8)]);
        a.aux_rank = descriptor_rank(Descriptor::R);
        b.aux_rank = descriptor_rank(Descriptor::S);
        assert_eq!(cmp_tree(&a, &b, false), Ordering::Equal);
        assert_eq!(compare(&a, &b), Ordering::Greater);

        // A constitutional difference still dominates a descriptor one.
        let c = with_children(6, vec![leaf(9)]);
        assert_eq!(compare(&a, &c), Ordering::Less);
    }

    #[test]
    fn parity_combination() {
        assert_eq!(Parity::Even.combine(Parity::Odd), Parity::Odd);
        assert_eq!(Parity::Odd.combine(Parity::Odd), Parity::Even);
        assert_eq!(Parity::Tied.combine(Parity::Even), Parity::Tied);
    }
}
