//! Reading program images from disk.

use std::fs;
use std::path::Path;

use crate::error::LoadError;
use synacor_common::Image;
use tracing::debug;

/// Read and decode the image file at `path`.
///
/// The file must hold at most 32768 little-endian words.
pub fn load_image(path: impl AsRef<Path>) -> Result<Image, LoadError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        kind: e.kind(),
    })?;

    let image = Image::decode(&bytes).map_err(|source| LoadError::Decode {
        path: path.display().to_string(),
        source,
    })?;

    debug!(path = %path.display(), words = image.len(), "loaded image");
    Ok(image)
}
