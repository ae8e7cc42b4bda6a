//! Input/output utilities: wire codecs and formatted log output.

pub(crate) mod format;
pub mod grids;
