//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, FORTRAN style scientific numbers and fixed width text fields
//! are needed by every CCCC codec.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod string_ext;
mod value_ext;

// Flatten
pub use string_ext::StringExt;
pub use value_ext::ValueExt;
