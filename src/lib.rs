//! CIP stereodescriptor assignment on molecular graphs.
//!
//! The crate takes a molecular graph with wedge/hash markers (and
//! optionally a 2-D depiction), perceives its stereogenic units, and
//! assigns R/S, r/s, and E/Z descriptors: perception ([`perceive`]),
//! priority comparison ([`ligand`]), classification ([`classify`]),
//! labeling ([`labeler`]), meso resolution ([`meso`]), and stereocenter
//! editing ([`flip`], [`graph_ops`]).

pub mod atom;
pub mod bond;
pub mod classify;
pub mod element;
pub mod flip;
pub mod graph_ops;
pub mod labeler;
pub mod ligand;
pub mod meso;
pub mod mol;
pub mod perceive;
pub mod ring_system;
pub mod rings;
pub mod traits;
pub mod wrappers;

pub use atom::Atom;
pub use bond::{Bond, BondOrder, EffectiveOrder, Wedge};
pub use classify::{classify, StereocenterCategory};
pub use element::standard_atomic_weight;
pub use flip::{flip, flip_all, flip_bond, permute_epimers};
pub use graph_ops::{renumber_atoms, RenumberError};
pub use labeler::{label, Diagnostic, Diagnostics, StereoConfig, StereoError};
pub use ligand::{compare, permutation_parity, Ligand, Parity};
pub use meso::{resolve as resolve_meso, MesoOutcome};
pub use mol::{
    AtomId, BondDescriptor, Conformation, Descriptor, Mol, StereoElement, StereoLabels, Winding,
};
pub use perceive::{perceive_from_depiction, perceive_from_wedges};
pub use ring_system::largest_ring_system;
pub use rings::RingFlags;
pub use traits::{
    HasAromaticity, HasAtomicNum, HasAtomicNumMut, HasBondOrder, HasBondOrderMut, HasFormalCharge,
    HasHydrogenCount, HasIsotope, HasPosition2D, HasWedge, HasWedgeMut,
};
pub use wrappers::WithPosition2D;
