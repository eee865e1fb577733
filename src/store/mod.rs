//! Observation loading.
//!
//! Each variable is a newline-delimited file of decimal observations. Loading
//! keeps every finite value in file order, tracks the global extremes, and
//! excludes variables whose distinct-value count exceeds [`crate::UNIQUE_LIMIT`].
mod extremes;
mod source;
mod store;
mod tail;
mod variable;

pub use extremes::*;
pub use source::*;
pub use store::*;
pub use tail::*;
pub use variable::*;
