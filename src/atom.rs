/// Default atom type for a molecular graph node.
///
/// `Atom` stores intrinsic atomic properties, the things you would read off
/// a structural formula. Computed state (ring membership, stereo
/// descriptors) lives outside the atom: ring flags in
/// [`RingFlags`](crate::rings::RingFlags), descriptors in the label map on
/// [`Mol`](crate::Mol). Coordinates are provided by the
/// [`WithPosition2D`](crate::wrappers::WithPosition2D) wrapper when a caller
/// has a drawing.
///
/// # Examples
///
/// ```
/// use stereocip::Atom;
///
/// let carbon = Atom {
///     atomic_num: 6,
///     formal_charge: 0,
///     isotope: 0,
///     hydrogen_count: 1,
///     is_aromatic: false,
/// };
/// assert_eq!(carbon.atomic_num, 6);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Atom {
    /// Atomic number (1 = H, 6 = C, 7 = N, …). `0` marks a query or
    /// R-group placeholder atom, which is excluded from stereo perception.
    pub atomic_num: u8,
    /// Formal charge in elementary charge units.
    pub formal_charge: i8,
    /// Mass number. `0` means natural isotopic abundance (the common case);
    /// a nonzero value takes part in CIP rule-2 mass comparison.
    pub isotope: u16,
    /// Number of virtual (suppressed) hydrogens on this atom.
    ///
    /// These are not graph nodes. During ligand gathering each one occupies
    /// a substituent slot as an [`AtomId::VirtualH`](crate::AtomId).
    pub hydrogen_count: u8,
    /// Whether this atom is part of an aromatic system, as flagged by the
    /// caller's aromaticity perception.
    pub is_aromatic: bool,
}

impl crate::traits::HasAtomicNum for Atom {
    fn atomic_num(&self) -> u8 {
        self.atomic_num
    }
}

impl crate::traits::HasAtomicNumMut for Atom {
    fn atomic_num_mut(&mut self) -> &mut u8 {
        &mut self.atomic_num
    }
}

impl crate::traits::HasFormalCharge for Atom {
    fn formal_charge(&self) -> i8 {
        self.formal_charge
    }
}

impl crate::traits::HasIsotope for Atom {
    fn isotope(&self) -> u16 {
        self.isotope
    }
}

impl crate::traits::HasHydrogenCount for Atom {
    fn hydrogen_count(&self) -> u8 {
        self.hydrogen_count
    }
}

impl crate::traits::HasAromaticity for Atom {
    fn is_aromatic(&self) -> bool {
        self.is_aromatic
    }
}
