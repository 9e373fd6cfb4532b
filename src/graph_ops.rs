//! Whole-graph permutation of atom indices.
//!
//! Stereo elements are index-based, so renumbering must carry them along;
//! descriptors are configuration, not numbering, and survive unchanged.

use std::collections::HashMap;

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::mol::{AtomId, Mol};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenumberError {
    WrongLength { expected: usize, got: usize },
    NotBijective { duplicate: usize },
}

impl std::fmt::Display for RenumberError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::WrongLength { expected, got } => {
                write!(f, "permutation has {got} entries, molecule has {expected} atoms")
            }
            Self::NotBijective { duplicate } => {
                write!(f, "index {duplicate} appears more than once in permutation")
            }
        }
    }
}

impl std::error::Error for RenumberError {}

/// Rebuild `mol` with atom `i` moved to index `order[i]`. Bond indices are
/// reassigned in the new adjacency order; stereo elements are remapped so
/// they describe the same configuration in the new numbering.
pub fn renumber_atoms<A, B>(mol: &Mol<A, B>, order: &[NodeIndex]) -> Result<Mol<A, B>, RenumberError>
where
    A: Clone,
    B: Clone,
{
    let n = mol.atom_count();
    if order.len() != n {
        return Err(RenumberError::WrongLength {
            expected: n,
            got: order.len(),
        });
    }
    let mut inverse = vec![usize::MAX; n];
    for (old, &new) in order.iter().enumerate() {
        if new.index() >= n {
            return Err(RenumberError::WrongLength {
                expected: n,
                got: order.len(),
            });
        }
        if inverse[new.index()] != usize::MAX {
            return Err(RenumberError::NotBijective {
                duplicate: new.index(),
            });
        }
        inverse[new.index()] = old;
    }

    let mut out = Mol::new();
    for new_idx in 0..n {
        out.add_atom(mol.atom(NodeIndex::new(inverse[new_idx])).clone());
    }
    let mut edge_map: HashMap<EdgeIndex, EdgeIndex> = HashMap::with_capacity(mol.bond_count());
    for edge in mol.bonds() {
        if let Some((u, v)) = mol.bond_endpoints(edge) {
            let new_edge = out.add_bond(order[u.index()], order[v.index()], mol.bond(edge).clone());
            edge_map.insert(edge, new_edge);
        }
    }

    let remap_atom = |id: AtomId| match id {
        AtomId::Node(x) => AtomId::Node(order[x.index()]),
        AtomId::VirtualH(x, h) => AtomId::VirtualH(order[x.index()], h),
    };
    let elements = mol
        .stereo_elements()
        .iter()
        .map(|e| e.map(remap_atom, |g| edge_map.get(&g).copied().unwrap_or(g)))
        .collect();
    out.set_stereo_elements(elements);
    Ok(out)
}
