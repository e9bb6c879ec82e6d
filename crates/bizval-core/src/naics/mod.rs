//! NAICS classification tree and industry multiplier bands.

pub mod index;
pub mod node;
pub mod reference;

pub use index::NaicsIndex;
pub use node::{MultiplierBand, NaicsNode};
pub use reference::{NaicsEntry, NaicsTable};
