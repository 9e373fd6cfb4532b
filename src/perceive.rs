//! Stereo element perception from a depiction.
//!
//! Elements are reconstructed from wedge/hash markers and, when the atom
//! type carries them, 2-D depiction coordinates. They are derived state:
//! re-run perception after any structural edit rather than patching the
//! element list.

use petgraph::graph::NodeIndex;

use crate::bond::{BondOrder, Wedge};
use crate::mol::{AtomId, Conformation, Mol, StereoElement, Winding};
use crate::traits::{HasAtomicNum, HasBondOrder, HasHydrogenCount, HasPosition2D, HasWedge};

/// Perceive every stereo element a 2-D depiction defines: tetrahedral
/// centers from wedges, double bonds from substituent placement, allene
/// axes from both. Replaces the molecule's element list.
pub fn perceive_from_depiction<A, B>(mol: &mut Mol<A, B>)
where
    A: HasAtomicNum + HasHydrogenCount + HasPosition2D,
    B: HasBondOrder + HasWedge,
{
    let mut elements = Vec::new();
    for atom in mol.atoms().collect::<Vec<_>>() {
        if let Some(e) = perceive_tetrahedral(mol, atom, true) {
            elements.push(e);
        } else if let Some(e) = perceive_allene_axis(mol, atom) {
            elements.push(e);
        }
    }
    for bond in mol.bonds().collect::<Vec<_>>() {
        if let Some(e) = perceive_double_bond(mol, bond) {
            elements.push(e);
        }
    }
    mol.set_stereo_elements(elements);
}

/// Wedge-only perception for graphs without coordinates. Substituent order
/// falls back to adjacency order, so results are deterministic but not
/// invariant under renumbering; prefer [`perceive_from_depiction`] when a
/// drawing exists.
pub fn perceive_from_wedges<A, B>(mol: &mut Mol<A, B>)
where
    A: HasAtomicNum + HasHydrogenCount,
    B: HasWedge,
{
    let mut elements = Vec::new();
    for atom in mol.atoms().collect::<Vec<_>>() {
        if let Some(e) = tetrahedral_from_wedge_order(mol, atom) {
            elements.push(e);
        }
    }
    mol.set_stereo_elements(elements);
}

fn substituent_slots<A, B>(mol: &Mol<A, B>, focus: NodeIndex) -> Vec<AtomId>
where
    A: HasHydrogenCount,
{
    let mut slots: Vec<AtomId> = mol.neighbors(focus).map(AtomId::Node).collect();
    for h in 0..mol.atom(focus).hydrogen_count() {
        slots.push(AtomId::VirtualH(focus, h));
    }
    slots
}

/// The wedge on the bond `focus`–`nb`, read only when its narrow end sits
/// at the focus.
fn wedge_from<A, B>(mol: &Mol<A, B>, focus: NodeIndex, nb: NodeIndex) -> Wedge
where
    B: HasWedge,
{
    match mol.bond_between(focus, nb) {
        Some(edge) => match mol.bond_endpoints(edge) {
            Some((narrow, _)) if narrow == focus => mol.bond(edge).wedge(),
            _ => Wedge::None,
        },
        None => Wedge::None,
    }
}

fn perceive_tetrahedral<A, B>(
    mol: &Mol<A, B>,
    focus: NodeIndex,
    use_coordinates: bool,
) -> Option<StereoElement>
where
    A: HasAtomicNum + HasHydrogenCount + HasPosition2D,
    B: HasWedge,
{
    if mol.atom(focus).atomic_num() == 0 {
        return None;
    }
    let slots = substituent_slots(mol, focus);
    if slots.len() != 4 {
        return None;
    }

    let has_wedge = slots.iter().any(|&s| match s {
        AtomId::Node(nb) => matches!(wedge_from(mol, focus, nb), Wedge::Up | Wedge::Down),
        AtomId::VirtualH(..) => false,
    });
    if !has_wedge {
        return None;
    }

    if use_coordinates {
        if let Some(winding) = winding_from_coordinates(mol, focus, &slots) {
            return Some(StereoElement::Tetrahedral {
                focus,
                ligands: [slots[0], slots[1], slots[2], slots[3]],
                winding,
            });
        }
    }
    tetrahedral_from_wedge_order_with_slots(mol, focus, slots)
}

/// Lift the depiction into 3-D: explicit neighbors at their drawn (x, y)
/// with z from their wedge, the virtual hydrogen antipodal to the mean of
/// the rest. Winding follows the sign of the triple product viewed from
/// the first substituent.
fn winding_from_coordinates<A, B>(
    mol: &Mol<A, B>,
    focus: NodeIndex,
    slots: &[AtomId],
) -> Option<Winding>
where
    A: HasPosition2D,
    B: HasWedge,
{
    let fp = mol.atom(focus).position_2d()?;
    let mut points: Vec<[f64; 3]> = Vec::with_capacity(4);
    let mut pending_h: Option<usize> = None;
    for (i, &slot) in slots.iter().enumerate() {
        match slot {
            AtomId::Node(nb) => {
                let p = mol.atom(nb).position_2d()?;
                let z = match wedge_from(mol, focus, nb) {
                    Wedge::Up => 1.0,
                    Wedge::Down => -1.0,
                    _ => 0.0,
                };
                points.push([p[0] - fp[0], p[1] - fp[1], z]);
            }
            AtomId::VirtualH(..) => {
                if pending_h.is_some() {
                    return None; // two implicit Hs cannot be placed
                }
                pending_h = Some(i);
                points.push([0.0, 0.0, 0.0]);
            }
        }
    }
    if let Some(i) = pending_h {
        let mut sum = [0.0f64; 3];
        for (j, p) in points.iter().enumerate() {
            if j != i {
                sum[0] += p[0];
                sum[1] += p[1];
                sum[2] += p[2];
            }
        }
        points[i] = [-sum[0], -sum[1], -sum[2]];
    }

    let signed = triple_product(
        sub(points[1], points[0]),
        sub(points[2], points[0]),
        sub(points[3], points[0]),
    );
    if signed > 1e-9 {
        Some(Winding::Cw)
    } else if signed < -1e-9 {
        Some(Winding::Ccw)
    } else {
        None
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn triple_product(a: [f64; 3], b: [f64; 3], c: [f64; 3]) -> f64 {
    a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
        + a[2] * (b[0] * c[1] - b[1] * c[0])
}

fn tetrahedral_from_wedge_order<A, B>(mol: &Mol<A, B>, focus: NodeIndex) -> Option<StereoElement>
where
    A: HasAtomicNum + HasHydrogenCount,
    B: HasWedge,
{
    if mol.atom(focus).atomic_num() == 0 {
        return None;
    }
    let slots = substituent_slots(mol, focus);
    if slots.len() != 4 {
        return None;
    }
    tetrahedral_from_wedge_order_with_slots(mol, focus, slots)
}

/// Coordinate-free fallback: the wedged neighbor leads the ligand order and
/// the wedge direction is taken as the winding of the remaining three in
/// adjacency order.
fn tetrahedral_from_wedge_order_with_slots<A, B>(
    mol: &Mol<A, B>,
    focus: NodeIndex,
    slots: Vec<AtomId>,
) -> Option<StereoElement>
where
    B: HasWedge,
{
    let (lead, winding) = slots.iter().enumerate().find_map(|(i, &s)| match s {
        AtomId::Node(nb) => match wedge_from(mol, focus, nb) {
            Wedge::Up => Some((i, Winding::Cw)),
            Wedge::Down => Some((i, Winding::Ccw)),
            _ => None,
        },
        AtomId::VirtualH(..) => None,
    })?;

    let mut ordered = slots;
    ordered.rotate_left(lead);
    Some(StereoElement::Tetrahedral {
        focus,
        ligands: [ordered[0], ordered[1], ordered[2], ordered[3]],
        winding,
    })
}

fn perceive_double_bond<A, B>(
    mol: &Mol<A, B>,
    bond: petgraph::graph::EdgeIndex,
) -> Option<StereoElement>
where
    A: HasAtomicNum + HasHydrogenCount + HasPosition2D,
    B: HasBondOrder,
{
    if mol.bond(bond).bond_order() != BondOrder::Double {
        return None;
    }
    let (u, v) = mol.bond_endpoints(bond)?;
    let side_a = side_slots(mol, u, v)?;
    let side_b = side_slots(mol, v, u)?;

    let pu = mol.atom(u).position_2d()?;
    let pv = mol.atom(v).position_2d()?;
    let ref_a = match side_a[0] {
        AtomId::Node(n) => mol.atom(n).position_2d()?,
        AtomId::VirtualH(..) => return None,
    };
    let ref_b = match side_b[0] {
        AtomId::Node(n) => mol.atom(n).position_2d()?,
        AtomId::VirtualH(..) => return None,
    };

    let axis = [pv[0] - pu[0], pv[1] - pu[1]];
    let sa = cross2(axis, [ref_a[0] - pu[0], ref_a[1] - pu[1]]);
    let sb = cross2(axis, [ref_b[0] - pu[0], ref_b[1] - pu[1]]);
    if sa.abs() < 1e-9 || sb.abs() < 1e-9 {
        return None; // collinear drawing carries no stereo
    }

    Some(StereoElement::DoubleBond {
        bond,
        side_a,
        side_b,
        conformation: if sa.signum() == sb.signum() {
            Conformation::Together
        } else {
            Conformation::Opposite
        },
    })
}

fn cross2(a: [f64; 2], b: [f64; 2]) -> f64 {
    a[0] * b[1] - a[1] * b[0]
}

/// The up-to-two substituents of `center` away from `partner`, explicit
/// neighbors first. `None` when the site is terminal with two implicit Hs
/// or overloaded.
fn side_slots<A, B>(mol: &Mol<A, B>, center: NodeIndex, partner: NodeIndex) -> Option<[AtomId; 2]>
where
    A: HasHydrogenCount,
{
    let mut slots: Vec<AtomId> = mol
        .neighbors(center)
        .filter(|&n| n != partner)
        .map(AtomId::Node)
        .collect();
    if slots.is_empty() {
        return None;
    }
    for h in 0..mol.atom(center).hydrogen_count() {
        slots.push(AtomId::VirtualH(center, h));
    }
    if slots.len() != 2 {
        return None;
    }
    Some([slots[0], slots[1]])
}

/// An allene-like axis: `focus` carries exactly two double bonds to two
/// distinct terminals, each with two substituent slots. The winding comes
/// from the first wedge found at either terminal, read over the peripheral
/// order `[a0, a1, b0, b1]`.
fn perceive_allene_axis<A, B>(mol: &Mol<A, B>, focus: NodeIndex) -> Option<StereoElement>
where
    A: HasAtomicNum + HasHydrogenCount + HasPosition2D,
    B: HasBondOrder + HasWedge,
{
    let doubles: Vec<NodeIndex> = mol
        .bonds_of(focus)
        .filter(|&e| mol.bond(e).bond_order() == BondOrder::Double)
        .filter_map(|e| mol.bond_endpoints(e))
        .map(|(a, b)| if a == focus { b } else { a })
        .collect();
    if doubles.len() != 2 || mol.neighbors(focus).count() != 2 {
        return None;
    }
    let (t0, t1) = (doubles[0], doubles[1]);
    let side_a = side_slots(mol, t0, focus)?;
    let side_b = side_slots(mol, t1, focus)?;

    let winding = [t0, t1].iter().find_map(|&t| {
        let slots = if t == t0 { side_a } else { side_b };
        slots.iter().find_map(|&s| match s {
            AtomId::Node(nb) => match wedge_from(mol, t, nb) {
                Wedge::Up => Some(Winding::Cw),
                Wedge::Down => Some(Winding::Ccw),
                _ => None,
            },
            AtomId::VirtualH(..) => None,
        })
    })?;

    Some(StereoElement::ExtendedTetrahedral {
        focus,
        terminals: [t0, t1],
        peripherals: [side_a[0], side_a[1], side_b[0], side_b[1]],
        winding,
    })
}
