//! Two-level Gaussian mixture: clusters of variables, components of values.
//!
//! ## Core Types
//!
//! - [`Mixture`] — Cluster and component parameter tables
//! - [`Gaussian`] — Univariate normal parameters and log-density
//! - [`Sampler`] — Random samples used for seeding and resampling
//!
//! ## Steps
//!
//! - [`Assignment`] — E-step: best component per value, best cluster per variable
//! - [`Reestimation`] — M-step: smoothed priors and refit Gaussians
mod assignment;
mod diagnostics;
mod gaussian;
mod mixture;
mod pools;
mod reestimation;
mod sampler;
mod slot;

pub use assignment::*;
pub use diagnostics::*;
pub use gaussian::*;
pub use mixture::*;
pub use pools::*;
pub use reestimation::*;
pub use sampler::*;
pub use slot::*;
