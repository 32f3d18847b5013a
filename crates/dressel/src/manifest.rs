use std::path::{Path, PathBuf};

use crate::resource::{InvalidPath, ResourcePair, ResourcePath};

/// Errors that can occur while loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {source}", .path.display())]
    InvalidEntry {
        path: PathBuf,
        line: usize,
        #[source]
        source: InvalidPath,
    },
}

/// Parse manifest text into resource paths, in file order.
///
/// One suffix per line. Surrounding whitespace is trimmed and blank lines are
/// skipped. Errors carry the 1-based line number; `origin` only labels them.
pub fn parse_suffixes(origin: &Path, contents: &str) -> Result<Vec<ResourcePath>, ManifestError> {
    contents
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let line = line.trim();
            (!line.is_empty()).then_some((idx + 1, line))
        })
        .map(|(line, raw)| {
            ResourcePath::parse(raw).map_err(|source| ManifestError::InvalidEntry {
                path: origin.to_path_buf(),
                line,
                source,
            })
        })
        .collect()
}

/// Read a single-list manifest from disk.
pub fn load_suffixes(path: &Path) -> Result<Vec<ResourcePath>, ManifestError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_suffixes(path, &contents)
}

/// Pair image and annotation suffixes by position.
///
/// Pairing stops at the shorter list. Leftover entries are dropped.
pub fn pair_suffixes(images: Vec<ResourcePath>, annotations: Vec<ResourcePath>) -> Vec<ResourcePair> {
    let dropped = images.len().abs_diff(annotations.len());
    if dropped > 0 {
        tracing::warn!(
            images = images.len(),
            annotations = annotations.len(),
            "manifest lists differ in length; dropping {dropped} unpaired entries"
        );
    }

    images
        .into_iter()
        .zip(annotations)
        .map(|(image, annotation)| ResourcePair { image, annotation })
        .collect()
}

/// Read a dual-list manifest from two files.
pub fn load_pairs(images: &Path, annotations: &Path) -> Result<Vec<ResourcePair>, ManifestError> {
    Ok(pair_suffixes(
        load_suffixes(images)?,
        load_suffixes(annotations)?,
    ))
}
