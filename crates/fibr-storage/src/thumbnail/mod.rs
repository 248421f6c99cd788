//! Thumbnail engine: preview rendering and the shadow tree under the
//! metadata directory.

pub mod generator;
pub mod render;

use sha1::{Digest, Sha1};

pub use generator::Thumbnailer;
pub use render::{ImageRenderer, PreviewRenderer};

/// Key identifying an entry in a batched thumbnail map: SHA-1 hex of its name.
pub fn fingerprint(name: &str) -> String {
    hex::encode(Sha1::digest(name.as_bytes()))
}
