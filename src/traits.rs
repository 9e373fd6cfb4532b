use crate::bond::{BondOrder, Wedge};

pub trait HasAtomicNum {
    fn atomic_num(&self) -> u8;
}

/// Mutable access to the atomic number, needed by the scoped attribute
/// patch that substitutes a placeholder element during labeling.
pub trait HasAtomicNumMut: HasAtomicNum {
    fn atomic_num_mut(&mut self) -> &mut u8;
}

pub trait HasFormalCharge {
    fn formal_charge(&self) -> i8;
}

pub trait HasIsotope {
    fn isotope(&self) -> u16;
}

pub trait HasHydrogenCount {
    fn hydrogen_count(&self) -> u8;
}

pub trait HasAromaticity {
    fn is_aromatic(&self) -> bool;
}

pub trait HasPosition2D {
    fn position_2d(&self) -> Option<[f64; 2]>;
    fn set_position_2d(&mut self, pos: Option<[f64; 2]>);
}

pub trait HasBondOrder {
    fn bond_order(&self) -> BondOrder;
}

pub trait HasBondOrderMut: HasBondOrder {
    fn bond_order_mut(&mut self) -> &mut BondOrder;
}

pub trait HasWedge {
    fn wedge(&self) -> Wedge;
}

pub trait HasWedgeMut: HasWedge {
    fn wedge_mut(&mut self) -> &mut Wedge;
}
