//! Ring-membership flags.
//!
//! Stereo perception only needs to know whether an atom or bond sits in a
//! ring, not the ring decomposition itself, so membership is derived from
//! bridge detection: a bond is a ring bond iff it is not a bridge. The
//! flags are recomputed as a whole for the molecule's current generation,
//! never incrementally patched.

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::mol::Mol;

#[derive(Debug, Clone)]
pub struct RingFlags {
    atom_in_ring: Vec<bool>,
    bond_in_ring: Vec<bool>,
}

impl RingFlags {
    pub fn perceive<A, B>(mol: &Mol<A, B>) -> Self {
        let n = mol.atom_count();
        let m = mol.bond_count();

        let mut adj: Vec<Vec<(NodeIndex, EdgeIndex)>> = vec![Vec::new(); n];
        for edge in mol.bonds() {
            if let Some((u, v)) = mol.bond_endpoints(edge) {
                adj[u.index()].push((v, edge));
                adj[v.index()].push((u, edge));
            }
        }

        let mut bond_in_ring = vec![true; m];
        for edge in find_bridges(n, &adj) {
            bond_in_ring[edge.index()] = false;
        }

        let mut atom_in_ring = vec![false; n];
        for edge in mol.bonds() {
            if bond_in_ring[edge.index()] {
                if let Some((u, v)) = mol.bond_endpoints(edge) {
                    atom_in_ring[u.index()] = true;
                    atom_in_ring[v.index()] = true;
                }
            }
        }

        Self {
            atom_in_ring,
            bond_in_ring,
        }
    }

    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.atom_in_ring.get(atom.index()).copied().unwrap_or(false)
    }

    pub fn is_ring_bond(&self, bond: EdgeIndex) -> bool {
        self.bond_in_ring.get(bond.index()).copied().unwrap_or(false)
    }

    pub fn num_ring_bonds(&self) -> usize {
        self.bond_in_ring.iter().filter(|&&b| b).count()
    }
}

/// Tarjan bridge detection, iterative so deep chains cannot overflow the
/// call stack.
fn find_bridges(n: usize, adj: &[Vec<(NodeIndex, EdgeIndex)>]) -> Vec<EdgeIndex> {
    const UNSEEN: usize = usize::MAX;
    let mut disc = vec![UNSEEN; n];
    let mut low = vec![0usize; n];
    let mut time = 0usize;
    let mut bridges = Vec::new();

    // Frame: (node, edge used to enter it, next adjacency slot to visit).
    let mut stack: Vec<(usize, Option<EdgeIndex>, usize)> = Vec::new();

    for root in 0..n {
        if disc[root] != UNSEEN {
            continue;
        }
        disc[root] = time;
        low[root] = time;
        time += 1;
        stack.push((root, None, 0));

        while !stack.is_empty() {
            let (node, via, slot) = *stack.last().unwrap();
            if slot < adj[node].len() {
                stack.last_mut().unwrap().2 += 1;
                let (next, edge) = adj[node][slot];
                if Some(edge) == via {
                    continue;
                }
                let next = next.index();
                if disc[next] == UNSEEN {
                    disc[next] = time;
                    low[next] = time;
                    time += 1;
                    stack.push((next, Some(edge), 0));
                } else {
                    low[node] = low[node].min(disc[next]);
                }
            } else {
                stack.pop();
                if let Some(&(parent, _, _)) = stack.last() {
                    low[parent] = low[parent].min(low[node]);
                    if low[node] > disc[parent] {
                        // via is the tree edge into `node`
                        if let Some(edge) = via {
                            bridges.push(edge);
                        }
                    }
                }
            }
        }
    }

    bridges
}
