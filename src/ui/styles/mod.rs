// SPDX-License-Identifier: MPL-2.0
//! Widget styles shared across views.

pub mod button;
pub mod container;
