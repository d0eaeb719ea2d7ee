// SPDX-License-Identifier: MPL-2.0
//! Application layer - Use cases and orchestration.
//!
//! - [`schema`]: upload form validation
//! - [`store`]: the result store observed by the viewer
//! - [`sequencer`]: request ordering, so stale responses are dropped
//! - [`port`]: trait definitions that infrastructure implements
//!
//! # Dependency Rule
//!
//! - Application layer depends on domain layer (uses domain types)
//! - Infrastructure layer implements application layer ports
//! - Presentation layer uses application layer services

pub mod port;
pub mod schema;
pub mod sequencer;
pub mod store;

pub use schema::{Candidate, Field, Issue, UploadSchema, ValidationErrors};
pub use sequencer::{RequestId, RequestSequencer};
pub use store::ResultStore;
