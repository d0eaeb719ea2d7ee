// SPDX-License-Identifier: MPL-2.0
//! Local media handling: reading files, decoding previews, extracting video
//! posters and holding blobs behind object URLs.

pub mod image;
pub mod mime;
pub mod object_url;
pub mod video;

pub use image::{decode_image, ImageData};
pub use mime::{mime_from_path, read_selected_file};
pub use object_url::ObjectUrlRegistry;
pub use video::{extract_poster, Poster, VideoInfo};
