//! Stereocenter inversion and epimer enumeration.
//!
//! Flipping inverts both representations of a center at once: the winding
//! of its stereo element and any Up/Down wedge whose narrow end sits on the
//! center, so a later re-perception from the depiction agrees with the
//! stored element.

use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::bond::Wedge;
use crate::mol::{Mol, StereoElement};
use crate::traits::{HasWedge, HasWedgeMut};

/// Invert the configuration at `center`. Returns false when no atom-centered
/// stereo element lives there.
pub fn flip<A, B>(mol: &mut Mol<A, B>, center: NodeIndex) -> bool
where
    B: HasWedge + HasWedgeMut,
{
    let inverted = match mol.tetrahedral_for(center) {
        Some(&StereoElement::Tetrahedral {
            focus,
            ligands,
            winding,
        }) => StereoElement::Tetrahedral {
            focus,
            ligands,
            winding: winding.inverted(),
        },
        Some(&StereoElement::ExtendedTetrahedral {
            focus,
            terminals,
            peripherals,
            winding,
        }) => StereoElement::ExtendedTetrahedral {
            focus,
            terminals,
            peripherals,
            winding: winding.inverted(),
        },
        _ => return false,
    };
    mol.replace_stereo_at(center, inverted);

    let incident: Vec<_> = mol.bonds_of(center).collect();
    for edge in incident {
        let narrow_here = mol
            .bond_endpoints(edge)
            .map_or(false, |(narrow, _)| narrow == center);
        if !narrow_here {
            continue;
        }
        let wedge = mol.bond(edge).wedge();
        if matches!(wedge, Wedge::Up | Wedge::Down) {
            *mol.bond_mut(edge).wedge_mut() = wedge.inverted();
        }
    }
    true
}

/// Invert the configuration of a double-bond element (E ↔ Z after
/// relabeling). Returns false when the bond carries no element.
pub fn flip_bond<A, B>(mol: &mut Mol<A, B>, bond: EdgeIndex) -> bool {
    let inverted = match mol.double_bond_for(bond) {
        Some(&StereoElement::DoubleBond {
            bond,
            side_a,
            side_b,
            conformation,
        }) => StereoElement::DoubleBond {
            bond,
            side_a,
            side_b,
            conformation: conformation.inverted(),
        },
        _ => return false,
    };
    let elements = mol
        .stereo_elements()
        .iter()
        .map(|e| match e {
            StereoElement::DoubleBond { bond: b, .. } if *b == bond => inverted,
            other => *other,
        })
        .collect();
    mol.set_stereo_elements(elements);
    true
}

/// Invert every atom-centered element: the enantiomer of the input.
/// Double-bond elements stay as they are; E/Z is invariant under
/// reflection.
pub fn flip_all<A, B>(mol: &mut Mol<A, B>)
where
    B: HasWedge + HasWedgeMut,
{
    let centers: Vec<NodeIndex> = mol
        .stereo_elements()
        .iter()
        .filter_map(StereoElement::focus)
        .collect();
    for center in centers {
        flip(mol, center);
    }
}

/// One copy per defined atom-centered element with exactly that center
/// flipped: the molecule's single-flip epimers. Structural duplicates are
/// dropped.
pub fn permute_epimers<A, B>(mol: &Mol<A, B>) -> Vec<Mol<A, B>>
where
    A: Clone + PartialEq,
    B: Clone + PartialEq + HasWedge + HasWedgeMut,
{
    let centers: Vec<NodeIndex> = mol
        .stereo_elements()
        .iter()
        .filter_map(StereoElement::focus)
        .collect();
    let mut out: Vec<Mol<A, B>> = Vec::with_capacity(centers.len());
    for &center in &centers {
        let mut isomer = mol.clone();
        flip(&mut isomer, center);
        if !out.contains(&isomer) {
            out.push(isomer);
        }
    }
    out
}
