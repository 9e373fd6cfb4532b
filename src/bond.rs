/// Bond order as recorded on the input graph.
///
/// `Unset` is a legitimate input state: depiction formats routinely leave
/// aromatic ring bonds without a Kekulé order. [`Bond::effective_order`]
/// resolves it explicitly instead of letting it fall through comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Quadruple,
    Aromatic,
    Unset,
}

/// Wedge/hash depiction marker on a bond, read from the first endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Wedge {
    #[default]
    None,
    /// Solid wedge: the far atom points toward the viewer.
    Up,
    /// Hashed wedge: the far atom points away from the viewer.
    Down,
    /// Squiggle: stereochemistry explicitly unknown.
    Either,
}

impl Wedge {
    /// Up ↔ Down; `None` and `Either` are their own inverses.
    pub fn inverted(self) -> Wedge {
        match self {
            Wedge::Up => Wedge::Down,
            Wedge::Down => Wedge::Up,
            other => other,
        }
    }
}

/// Three-state resolution of a bond's order, distinguishing the
/// "unset but flagged aromatic" case from a genuinely missing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectiveOrder {
    Order(BondOrder),
    /// Order is `Unset` but the bond carries the aromatic flag.
    AromaticUnset,
    /// Order is `Unset` with no aromatic flag: a missing attribute,
    /// subject to the scoped patch during labeling.
    Missing,
}

/// Default bond type for a molecular graph edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    pub order: BondOrder,
    /// Set by the caller's aromaticity perception; consulted when the
    /// order is `Unset`.
    pub is_aromatic: bool,
    pub wedge: Wedge,
}

impl Default for Bond {
    fn default() -> Self {
        Self {
            order: BondOrder::Single,
            is_aromatic: false,
            wedge: Wedge::None,
        }
    }
}

impl Bond {
    pub fn effective_order(&self) -> EffectiveOrder {
        match self.order {
            BondOrder::Unset if self.is_aromatic => EffectiveOrder::AromaticUnset,
            BondOrder::Unset => EffectiveOrder::Missing,
            order => EffectiveOrder::Order(order),
        }
    }
}

impl crate::traits::HasBondOrder for Bond {
    fn bond_order(&self) -> BondOrder {
        self.order
    }
}

impl crate::traits::HasBondOrderMut for Bond {
    fn bond_order_mut(&mut self) -> &mut BondOrder {
        &mut self.order
    }
}

impl crate::traits::HasAromaticity for Bond {
    fn is_aromatic(&self) -> bool {
        self.is_aromatic
    }
}

impl crate::traits::HasWedge for Bond {
    fn wedge(&self) -> Wedge {
        self.wedge
    }
}

impl crate::traits::HasWedgeMut for Bond {
    fn wedge_mut(&mut self) -> &mut Wedge {
        &mut self.wedge
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_order_plain() {
        let b = Bond {
            order: BondOrder::Double,
            ..Bond::default()
        };
        assert_eq!(b.effective_order(), EffectiveOrder::Order(BondOrder::Double));
    }

    #[test]
    fn effective_order_aromatic_unset() {
        let b = Bond {
            order: BondOrder::Unset,
            is_aromatic: true,
            ..Bond::default()
        };
        assert_eq!(b.effective_order(), EffectiveOrder::AromaticUnset);
    }

    #[test]
    fn effective_order_missing() {
        let b = Bond {
            order: BondOrder::Unset,
            ..Bond::default()
        };
        assert_eq!(b.effective_order(), EffectiveOrder::Missing);
    }

    #[test]
    fn wedge_inversion_round_trip() {
        assert_eq!(Wedge::Up.inverted(), Wedge::Down);
        assert_eq!(Wedge::Down.inverted().inverted(), Wedge::Down);
        assert_eq!(Wedge::Either.inverted(), Wedge::Either);
    }
}
