// SPDX-License-Identifier: MPL-2.0
//! Centralized default values for all configuration constants.
//!
//! # Categories
//!
//! - **Service**: Endpoints and request timeout
//! - **Upload**: Form validation behaviour
//! - **Notifications**: Toast durations

// ==========================================================================
// Service Defaults
// ==========================================================================

/// Hosted service used by the image-only workflow.
pub const DEFAULT_IMAGE_ONLY_ENDPOINT: &str = "https://image-dehazing-wg25.onrender.com/";

/// Local service used by the combined image/video workflow.
pub const DEFAULT_COMBINED_ENDPOINT: &str = "http://localhost:5000/";

/// Default request timeout in seconds. Video dehazing is slow.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Minimum request timeout in seconds.
pub const MIN_TIMEOUT_SECS: u64 = 5;

/// Maximum request timeout in seconds.
pub const MAX_TIMEOUT_SECS: u64 = 3600;

// ==========================================================================
// Upload Defaults
// ==========================================================================

/// Whether the declared media type must match the file's MIME category.
pub const DEFAULT_STRICT_KIND_CHECK: bool = true;

// ==========================================================================
// Notification Defaults
// ==========================================================================

/// Auto-dismiss delay for success and info toasts, in milliseconds.
pub const DEFAULT_TOAST_DURATION_MS: u64 = 3000;

/// Auto-dismiss delay for warning toasts, in milliseconds.
pub const WARNING_TOAST_DURATION_MS: u64 = 5000;

// ==========================================================================
// Compile-time Validation
// ==========================================================================

const _: () = {
    assert!(MIN_TIMEOUT_SECS > 0);
    assert!(MAX_TIMEOUT_SECS > MIN_TIMEOUT_SECS);
    assert!(DEFAULT_TIMEOUT_SECS >= MIN_TIMEOUT_SECS);
    assert!(DEFAULT_TIMEOUT_SECS <= MAX_TIMEOUT_SECS);
    assert!(WARNING_TOAST_DURATION_MS >= DEFAULT_TOAST_DURATION_MS);
};
