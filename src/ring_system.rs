//! Fused-ring-system complexity measure.
//!
//! The labeler chooses between its precise and fast paths based on how
//! tangled the largest fused ring system is. The measure is the first Betti
//! number of each ring-bond component (`bonds - atoms + 1`), a pure
//! complexity proxy with no chemical meaning.

use petgraph::graph::NodeIndex;

use crate::mol::Mol;
use crate::rings::RingFlags;

/// Maximum `bonds - atoms + 1` over the connected components of the
/// ring-flagged subgraph, or 0 for an acyclic molecule.
///
/// A single ring scores 1, naphthalene-like fusions 2, adamantane-like
/// cages 3, and so on.
pub fn largest_ring_system<A, B>(mol: &Mol<A, B>, flags: &RingFlags) -> usize {
    let n = mol.atom_count();

    // Adjacency restricted to ring bonds; atoms left bondless drop out by
    // never being visited.
    let mut adj: Vec<Vec<NodeIndex>> = vec![Vec::new(); n];
    let mut ring_degree = vec![0usize; n];
    for edge in mol.bonds() {
        if !flags.is_ring_bond(edge) {
            continue;
        }
        if let Some((u, v)) = mol.bond_endpoints(edge) {
            adj[u.index()].push(v);
            adj[v.index()].push(u);
            ring_degree[u.index()] += 1;
            ring_degree[v.index()] += 1;
        }
    }

    let mut visited = vec![false; n];
    let mut max_rank = 0usize;

    for start in 0..n {
        if visited[start] || ring_degree[start] == 0 {
            continue;
        }
        let mut atoms = 0usize;
        let mut bond_ends = 0usize;
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(node) = stack.pop() {
            atoms += 1;
            bond_ends += adj[node].len();
            for &nb in &adj[node] {
                if !visited[nb.index()] {
                    visited[nb.index()] = true;
                    stack.push(nb.index());
                }
            }
        }
        let bonds = bond_ends / 2;
        max_rank = max_rank.max(bonds + 1 - atoms);
    }

    max_rank
}
