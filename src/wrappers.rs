use crate::traits::*;

/// Decorates an atom type with an optional 2-D depiction position.
///
/// Perception uses positions, when present, to lift wedges into a 3-D
/// arrangement around a stereocenter and to place double-bond substituents
/// on a side; atom types without a drawing stay coordinate-free.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WithPosition2D<T> {
    pub inner: T,
    pub position_2d: Option<[f64; 2]>,
}

impl<T> WithPosition2D<T> {
    pub fn at(inner: T, x: f64, y: f64) -> Self {
        Self {
            inner,
            position_2d: Some([x, y]),
        }
    }
}

impl<T> HasPosition2D for WithPosition2D<T> {
    fn position_2d(&self) -> Option<[f64; 2]> {
        self.position_2d
    }
    fn set_position_2d(&mut self, pos: Option<[f64; 2]>) {
        self.position_2d = pos;
    }
}

macro_rules! delegate_trait {
    ($wrapper:ident, $trait:ident, $method:ident, $ret:ty) => {
        impl<T: $trait> $trait for $wrapper<T> {
            fn $method(&self) -> $ret {
                self.inner.$method()
            }
        }
    };
}

delegate_trait!(WithPosition2D, HasAtomicNum, atomic_num, u8);
delegate_trait!(WithPosition2D, HasFormalCharge, formal_charge, i8);
delegate_trait!(WithPosition2D, HasIsotope, isotope, u16);
delegate_trait!(WithPosition2D, HasHydrogenCount, hydrogen_count, u8);
delegate_trait!(WithPosition2D, HasAromaticity, is_aromatic, bool);

impl<T: HasAtomicNumMut> HasAtomicNumMut for WithPosition2D<T> {
    fn atomic_num_mut(&mut self) -> &mut u8 {
        self.inner.atomic_num_mut()
    }
}
