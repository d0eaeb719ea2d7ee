// SPDX-License-Identifier: MPL-2.0
//! Port definitions (traits) for dependency inversion.
//!
//! Infrastructure adapters implement these traits; the application only sees
//! domain types.
//!
//! # Available Ports
//!
//! - [`dehaze`]: the remote dehazing service

pub mod dehaze;

pub use dehaze::{DehazeService, ServiceError, ServiceResponse};
