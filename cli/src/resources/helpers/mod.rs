//! Low-level helpers used by resources.
pub mod fs;
