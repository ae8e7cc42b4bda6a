//! Helper items describing atoms and molecular geometries.

pub mod atom;
pub mod molecule;
