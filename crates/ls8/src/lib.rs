//! Host side of the LS-8 byte machine: program images and trace rendering.

/// Binary-text program image loading.
pub mod image;
pub use image::{load_image, parse_image, LoadError, MAX_LITERAL_DIGITS};

/// Text trace sink.
pub mod trace;
pub use trace::{format_event, TextTrace};
