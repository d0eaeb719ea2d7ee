// SPDX-License-Identifier: MPL-2.0
//! Domain layer - Core business logic with ZERO external dependencies.
//!
//! This module contains pure domain types, value objects, and business rules.
//! It has no dependencies on external crates (except `std`) to ensure
//! testability and architectural purity.
//!
//! # Modules
//!
//! - [`diagnostics`]: Diagnostics types ([`BufferCapacity`](diagnostics::BufferCapacity))
//! - [`media`]: Media types ([`MediaKind`](media::MediaKind), [`Blob`](media::Blob),
//!   [`ObjectUrl`](media::ObjectUrl), [`ProcessingModel`](media::ProcessingModel))
//! - [`upload`]: Upload round-trip types ([`UploadRequest`](upload::UploadRequest),
//!   [`UploadResult`](upload::UploadResult))

pub mod diagnostics;
pub mod media;
pub mod upload;
