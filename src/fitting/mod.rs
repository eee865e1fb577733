//! Iteration driver and its inputs and outputs.
//!
//! - [`Config`] — Mixture shape, sample size, seed, stopping bounds
//! - [`Driver`] — Alternates E-steps and M-steps
//! - [`Policy`] — Decides when to stop, given each [`Epoch`]
//! - [`Report`] — Final assignments and parameter tables
mod config;
mod driver;
mod epoch;
mod policy;
mod report;

pub use config::*;
pub use driver::*;
pub use epoch::*;
pub use policy::*;
pub use report::*;
