// SPDX-License-Identifier: MPL-2.0
//! Infrastructure layer adapters.
//!
//! Concrete implementations of the port traits defined in
//! `application::port`.
//!
//! # Available Adapters
//!
//! - [`http`]: the dehazing service over HTTP (implements [`DehazeService`])
//!
//! [`DehazeService`]: crate::application::port::DehazeService

pub mod http;

pub use http::{HttpClientConfig, HttpDehazeClient};
