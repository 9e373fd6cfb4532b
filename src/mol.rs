use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

/// A substituent slot around a stereocenter: either a real graph node or a
/// virtual (suppressed) hydrogen hanging off one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AtomId {
    Node(NodeIndex),
    VirtualH(NodeIndex, u8),
}

/// Geometric sense of a tetrahedral arrangement: looking from the first
/// ligand toward the focus, the remaining three appear clockwise (`Cw`) or
/// counterclockwise (`Ccw`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Winding {
    Cw,
    Ccw,
}

impl Winding {
    pub fn inverted(self) -> Winding {
        match self {
            Winding::Cw => Winding::Ccw,
            Winding::Ccw => Winding::Cw,
        }
    }
}

/// Relative placement of the two reference substituents of a double bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conformation {
    Together,
    Opposite,
}

impl Conformation {
    pub fn inverted(self) -> Conformation {
        match self {
            Conformation::Together => Conformation::Opposite,
            Conformation::Opposite => Conformation::Together,
        }
    }
}

/// A perceived stereogenic unit, reconstructed from wedges/coordinates
/// whenever perception runs. The ligand and peripheral arrays never contain
/// the focus itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StereoElement {
    Tetrahedral {
        focus: NodeIndex,
        ligands: [AtomId; 4],
        winding: Winding,
    },
    /// Allene-like axis: `terminals` are the two sp2 ends of the cumulated
    /// system, `peripherals` their substituents (two per terminal).
    ExtendedTetrahedral {
        focus: NodeIndex,
        terminals: [NodeIndex; 2],
        peripherals: [AtomId; 4],
        winding: Winding,
    },
    DoubleBond {
        bond: EdgeIndex,
        /// Substituents of the first bond atom; `side_a[0]` is the
        /// reference the conformation speaks about.
        side_a: [AtomId; 2],
        side_b: [AtomId; 2],
        conformation: Conformation,
    },
}

impl StereoElement {
    /// The atom this element is centered on, if it is atom-centered.
    pub fn focus(&self) -> Option<NodeIndex> {
        match self {
            StereoElement::Tetrahedral { focus, .. }
            | StereoElement::ExtendedTetrahedral { focus, .. } => Some(*focus),
            StereoElement::DoubleBond { .. } => None,
        }
    }

    /// Rebuild this element with every atom reference passed through `f`
    /// and every bond reference through `g`.
    pub fn map(
        &self,
        mut f: impl FnMut(AtomId) -> AtomId,
        mut g: impl FnMut(EdgeIndex) -> EdgeIndex,
    ) -> StereoElement {
        let map_node = |id: AtomId, f: &mut dyn FnMut(AtomId) -> AtomId| match f(id) {
            AtomId::Node(n) => n,
            AtomId::VirtualH(n, _) => n,
        };
        match *self {
            StereoElement::Tetrahedral {
                focus,
                ligands,
                winding,
            } => StereoElement::Tetrahedral {
                focus: map_node(AtomId::Node(focus), &mut f),
                ligands: ligands.map(&mut f),
                winding,
            },
            StereoElement::ExtendedTetrahedral {
                focus,
                terminals,
                peripherals,
                winding,
            } => StereoElement::ExtendedTetrahedral {
                focus: map_node(AtomId::Node(focus), &mut f),
                terminals: terminals.map(|t| map_node(AtomId::Node(t), &mut f)),
                peripherals: peripherals.map(&mut f),
                winding,
            },
            StereoElement::DoubleBond {
                bond,
                side_a,
                side_b,
                conformation,
            } => StereoElement::DoubleBond {
                bond: g(bond),
                side_a: side_a.map(&mut f),
                side_b: side_b.map(&mut f),
                conformation,
            },
        }
    }
}

/// CIP descriptor of an atom.
///
/// `PseudoR`/`PseudoS` are the lower-case r/s of pseudo-asymmetric centers.
/// `Either` means the center is real but its configuration is unassigned;
/// `NonChiral` means the atom can never carry a descriptor (meso-redundant
/// or plainly non-stereogenic).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Descriptor {
    R,
    S,
    PseudoR,
    PseudoS,
    Either,
    NonChiral,
    #[default]
    Unknown,
}

impl Descriptor {
    /// Whether this is an assigned configuration (R, S, r, or s).
    pub fn is_defined(self) -> bool {
        matches!(
            self,
            Descriptor::R | Descriptor::S | Descriptor::PseudoR | Descriptor::PseudoS
        )
    }
}

/// CIP descriptor of a double bond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondDescriptor {
    E,
    Z,
    Either,
    #[default]
    None,
}

/// The label map a labeling pass writes back onto the molecule.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StereoLabels {
    pub atoms: HashMap<NodeIndex, Descriptor>,
    pub bonds: HashMap<EdgeIndex, BondDescriptor>,
}

/// Molecular graph: atoms of type `A` on nodes, bonds of type `B` on edges,
/// plus the perceived stereo elements and a generation-stamped label cache.
///
/// Any structural mutation (atom/bond add or remove, payload mutation
/// through `atom_mut`/`bond_mut`, stereo element edits) bumps a generation
/// counter; cached labels stamped with an older generation read back as
/// absent. This gives the grouped cache invalidation the labeling pipeline
/// relies on without per-field dirty tracking.
pub struct Mol<A, B> {
    graph: UnGraph<A, B>,
    elements: Vec<StereoElement>,
    generation: u64,
    labels: Option<(u64, StereoLabels)>,
}

impl<A, B> Mol<A, B> {
    pub fn new() -> Self {
        Self {
            graph: UnGraph::default(),
            elements: Vec::new(),
            generation: 0,
            labels: None,
        }
    }

    pub fn graph(&self) -> &UnGraph<A, B> {
        &self.graph
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn touch(&mut self) {
        self.generation += 1;
    }

    pub fn atom(&self, idx: NodeIndex) -> &A {
        &self.graph[idx]
    }

    pub fn atom_mut(&mut self, idx: NodeIndex) -> &mut A {
        self.touch();
        &mut self.graph[idx]
    }

    pub fn bond(&self, idx: EdgeIndex) -> &B {
        &self.graph[idx]
    }

    pub fn bond_mut(&mut self, idx: EdgeIndex) -> &mut B {
        self.touch();
        &mut self.graph[idx]
    }

    pub fn add_atom(&mut self, atom: A) -> NodeIndex {
        self.touch();
        self.graph.add_node(atom)
    }

    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: B) -> EdgeIndex {
        self.touch();
        self.graph.add_edge(a, b, bond)
    }

    /// Remove an atom together with its incident bonds and any stereo
    /// element referencing it. petgraph swaps the last node into the freed
    /// slot and reshuffles edge indices, so surviving elements are remapped
    /// by node and their bond references re-resolved by endpoint.
    pub fn remove_atom(&mut self, idx: NodeIndex) -> Option<A> {
        self.touch();
        let last = NodeIndex::new(self.graph.node_count().saturating_sub(1));
        self.elements.retain(|e| !element_references_atom(e, idx));
        // Stale edge indices cannot be trusted after the removal; the
        // endpoint pair, captured now, still identifies the bond.
        let endpoints: Vec<Option<(NodeIndex, NodeIndex)>> = self
            .elements
            .iter()
            .map(|e| match e {
                StereoElement::DoubleBond { bond, .. } => self.graph.edge_endpoints(*bond),
                _ => None,
            })
            .collect();
        let atom = self.graph.remove_node(idx)?;
        let remap_node = |n: NodeIndex| if n == last { idx } else { n };
        let remap = |id: AtomId| match id {
            AtomId::Node(n) => AtomId::Node(remap_node(n)),
            AtomId::VirtualH(n, h) => AtomId::VirtualH(remap_node(n), h),
        };
        let old = std::mem::take(&mut self.elements);
        for (element, ends) in old.iter().zip(&endpoints) {
            match element.map(remap, |g| g) {
                StereoElement::DoubleBond {
                    side_a,
                    side_b,
                    conformation,
                    ..
                } => {
                    // A bond touching the removed atom went with it.
                    let resolved = match ends {
                        Some((a, b)) if *a != idx && *b != idx => {
                            self.graph.find_edge(remap_node(*a), remap_node(*b))
                        }
                        _ => None,
                    };
                    if let Some(bond) = resolved {
                        self.elements.push(StereoElement::DoubleBond {
                            bond,
                            side_a,
                            side_b,
                            conformation,
                        });
                    }
                }
                other => self.elements.push(other),
            }
        }
        Some(atom)
    }

    pub fn remove_bond(&mut self, idx: EdgeIndex) -> Option<B> {
        self.touch();
        self.elements.retain(|e| match e {
            StereoElement::DoubleBond { bond, .. } => *bond != idx,
            _ => true,
        });
        self.graph.remove_edge(idx)
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors(idx)
    }

    pub fn bonds_of(&self, idx: NodeIndex) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edges(idx).map(|e| e.id())
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    pub fn stereo_elements(&self) -> &[StereoElement] {
        &self.elements
    }

    pub fn set_stereo_elements(&mut self, elements: Vec<StereoElement>) {
        self.touch();
        self.elements = elements;
    }

    pub fn add_stereo_element(&mut self, element: StereoElement) {
        self.touch();
        self.elements.push(element);
    }

    pub fn tetrahedral_for(&self, center: NodeIndex) -> Option<&StereoElement> {
        self.elements.iter().find(|e| e.focus() == Some(center))
    }

    pub fn double_bond_for(&self, edge: EdgeIndex) -> Option<&StereoElement> {
        self.elements.iter().find(|e| match e {
            StereoElement::DoubleBond { bond, .. } => *bond == edge,
            _ => false,
        })
    }

    /// Replace the element centered on `center` (if any) with `element`.
    pub fn replace_stereo_at(&mut self, center: NodeIndex, element: StereoElement) {
        self.touch();
        self.elements.retain(|e| e.focus() != Some(center));
        self.elements.push(element);
    }

    pub fn remove_stereo_at(&mut self, center: NodeIndex) {
        self.touch();
        self.elements.retain(|e| e.focus() != Some(center));
    }

    /// Store a freshly computed label map, stamped with the current
    /// generation.
    pub fn set_labels(&mut self, labels: StereoLabels) {
        self.labels = Some((self.generation, labels));
    }

    /// The cached label map, or `None` if the molecule mutated since it was
    /// computed.
    pub fn labels(&self) -> Option<&StereoLabels> {
        match &self.labels {
            Some((gen, labels)) if *gen == self.generation => Some(labels),
            _ => None,
        }
    }

    pub fn atom_descriptor(&self, idx: NodeIndex) -> Descriptor {
        self.labels()
            .and_then(|l| l.atoms.get(&idx).copied())
            .unwrap_or_default()
    }

    pub fn bond_descriptor(&self, idx: EdgeIndex) -> BondDescriptor {
        self.labels()
            .and_then(|l| l.bonds.get(&idx).copied())
            .unwrap_or_default()
    }
}

fn element_references_atom(e: &StereoElement, idx: NodeIndex) -> bool {
    let id_hits = |id: &AtomId| match id {
        AtomId::Node(n) | AtomId::VirtualH(n, _) => *n == idx,
    };
    match e {
        StereoElement::Tetrahedral { focus, ligands, .. } => {
            *focus == idx || ligands.iter().any(id_hits)
        }
        StereoElement::ExtendedTetrahedral {
            focus,
            terminals,
            peripherals,
            ..
        } => *focus == idx || terminals.contains(&idx) || peripherals.iter().any(id_hits),
        StereoElement::DoubleBond { side_a, side_b, .. } => {
            side_a.iter().any(id_hits) || side_b.iter().any(id_hits)
        }
    }
}

impl<A: Clone, B: Clone> Clone for Mol<A, B> {
    fn clone(&self) -> Self {
        Self {
            graph: self.graph.clone(),
            elements: self.elements.clone(),
            generation: self.generation,
            labels: self.labels.clone(),
        }
    }
}

impl<A, B> Default for Mol<A, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: PartialEq, B: PartialEq> PartialEq for Mol<A, B> {
    fn eq(&self, other: &Self) -> bool {
        if self.atom_count() != other.atom_count() || self.bond_count() != other.bond_count() {
            return false;
        }
        for idx in self.atoms() {
            if self.atom(idx) != other.atom(idx) {
                return false;
            }
        }
        for idx in self.bonds() {
            if self.bond(idx) != other.bond(idx)
                || self.bond_endpoints(idx) != other.bond_endpoints(idx)
            {
                return false;
            }
        }
        // Label caches and generations are derived state and do not take
        // part in structural equality.
        let mut mine = self.elements.clone();
        let mut theirs = other.elements.clone();
        mine.sort_by_key(element_sort_key);
        theirs.sort_by_key(element_sort_key);
        mine == theirs
    }
}

fn element_sort_key(e: &StereoElement) -> (u8, usize) {
    match e {
        StereoElement::Tetrahedral { focus, .. } => (0, focus.index()),
        StereoElement::ExtendedTetrahedral { focus, .. } => (1, focus.index()),
        StereoElement::DoubleBond { bond, .. } => (2, bond.index()),
    }
}

impl<A: std::fmt::Debug, B: std::fmt::Debug> std::fmt::Debug for Mol<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mol")
            .field("atom_count", &self.atom_count())
            .field("bond_count", &self.bond_count())
            .field("stereo_elements", &self.elements)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;

    #[test]
    fn mutation_invalidates_labels() {
        let mut mol = Mol::<Atom, Bond>::new();
        let c = mol.add_atom(Atom {
            atomic_num: 6,
            ..Atom::default()
        });
        let mut labels = StereoLabels::default();
        labels.atoms.insert(c, Descriptor::R);
        mol.set_labels(labels);
        assert_eq!(mol.atom_descriptor(c), Descriptor::R);

        mol.add_atom(Atom::default());
        assert!(mol.labels().is_none());
        assert_eq!(mol.atom_descriptor(c), Descriptor::Unknown);
    }

    #[test]
    fn payload_mutation_invalidates_labels() {
        let mut mol = Mol::<Atom, Bond>::new();
        let c = mol.add_atom(Atom::default());
        mol.set_labels(StereoLabels::default());
        assert!(mol.labels().is_some());
        mol.atom_mut(c).isotope = 13;
        assert!(mol.labels().is_none());
    }

    #[test]
    fn replace_stereo_keeps_one_element_per_focus() {
        let mut mol = Mol::<Atom, Bond>::new();
        let c = mol.add_atom(Atom::default());
        let ligs = [AtomId::VirtualH(c, 0); 4];
        mol.add_stereo_element(StereoElement::Tetrahedral {
            focus: c,
            ligands: ligs,
            winding: Winding::Cw,
        });
        mol.replace_stereo_at(
            c,
            StereoElement::Tetrahedral {
                focus: c,
                ligands: ligs,
                winding: Winding::Ccw,
            },
        );
        assert_eq!(mol.stereo_elements().len(), 1);
        match mol.tetrahedral_for(c) {
            Some(StereoElement::Tetrahedral { winding, .. }) => {
                assert_eq!(*winding, Winding::Ccw)
            }
            other => panic!("unexpected element {other:?}"),
        }
    }

    #[test]
    fn remove_atom_drops_referencing_elements() {
        let mut mol = Mol::<Atom, Bond>::new();
        let c = mol.add_atom(Atom::default());
        let f = mol.add_atom(Atom {
            atomic_num: 9,
            ..Atom::default()
        });
        mol.add_bond(c, f, Bond::default());
        mol.add_stereo_element(StereoElement::Tetrahedral {
            focus: c,
            ligands: [
                AtomId::Node(f),
                AtomId::VirtualH(c, 0),
                AtomId::VirtualH(c, 1),
                AtomId::VirtualH(c, 2),
            ],
            winding: Winding::Cw,
        });
        mol.remove_atom(f);
        assert!(mol.stereo_elements().is_empty());
    }

    #[test]
    fn remove_atom_re_resolves_double_bond_edges() {
        // The double bond is the last edge inserted, so removing an
        // earlier edge reshuffles its index.
        let mut mol = Mol::<Atom, Bond>::new();
        let c1 = mol.add_atom(Atom::default());
        let c2 = mol.add_atom(Atom::default());
        let f = mol.add_atom(Atom {
            atomic_num: 9,
            ..Atom::default()
        });
        let cl = mol.add_atom(Atom {
            atomic_num: 17,
            ..Atom::default()
        });
        let stray = mol.add_atom(Atom::default());
        mol.add_bond(c1, f, Bond::default());
        mol.add_bond(c2, cl, Bond::default());
        mol.add_bond(c1, stray, Bond::default());
        let double = mol.add_bond(c1, c2, Bond::default());
        mol.add_stereo_element(StereoElement::DoubleBond {
            bond: double,
            side_a: [AtomId::Node(f), AtomId::VirtualH(c1, 0)],
            side_b: [AtomId::Node(cl), AtomId::VirtualH(c2, 0)],
            conformation: Conformation::Together,
        });

        mol.remove_atom(stray);
        let resolved = mol.bond_between(c1, c2).unwrap();
        assert_ne!(resolved, double);
        match mol.double_bond_for(resolved) {
            Some(StereoElement::DoubleBond { conformation, .. }) => {
                assert_eq!(*conformation, Conformation::Together)
            }
            other => panic!("unexpected element {other:?}"),
        }
    }

    #[test]
    fn remove_atom_drops_element_of_a_removed_double_bond() {
        // c1 is an endpoint of the bond but appears in no side slot, so
        // only the endpoint check can drop the element.
        let mut mol = Mol::<Atom, Bond>::new();
        let c1 = mol.add_atom(Atom::default());
        let c2 = mol.add_atom(Atom::default());
        let f = mol.add_atom(Atom {
            atomic_num: 9,
            ..Atom::default()
        });
        let cl = mol.add_atom(Atom {
            atomic_num: 17,
            ..Atom::default()
        });
        let br = mol.add_atom(Atom {
            atomic_num: 35,
            ..Atom::default()
        });
        let bond = mol.add_bond(c1, c2, Bond::default());
        mol.add_bond(c1, f, Bond::default());
        mol.add_bond(c1, br, Bond::default());
        mol.add_bond(c2, cl, Bond::default());
        mol.add_stereo_element(StereoElement::DoubleBond {
            bond,
            side_a: [AtomId::Node(f), AtomId::Node(br)],
            side_b: [AtomId::Node(cl), AtomId::VirtualH(c2, 0)],
            conformation: Conformation::Together,
        });

        mol.remove_atom(c1);
        assert!(mol.stereo_elements().is_empty());
    }

    #[test]
    fn structural_equality_ignores_labels() {
        let mut a = Mol::<Atom, Bond>::new();
        let c = a.add_atom(Atom::default());
        let mut b = a.clone();
        let mut labels = StereoLabels::default();
        labels.atoms.insert(c, Descriptor::S);
        b.set_labels(labels);
        assert_eq!(a, b);
    }
}
