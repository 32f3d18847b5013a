use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Reasons a path suffix is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidPath {
    #[error("path is empty")]
    Empty,

    #[error("path must be relative: {0}")]
    Absolute(String),

    #[error("path contains an empty segment: {0}")]
    EmptySegment(String),

    #[error("path escapes the mirror root: {0}")]
    Traversal(String),

    #[error("path contains a reserved character: {0}")]
    Reserved(String),
}

/// A resource path suffix on the remote archive.
///
/// The same string names the remote resource (appended to the base URL) and
/// the artifact's location relative to the local mirror root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourcePath(String);

impl ResourcePath {
    /// Validate a suffix. Rejects anything that would resolve outside the
    /// mirror root once joined to it.
    ///
    /// Segments are split on `/` only, so `\` and `:` are refused outright:
    /// on Windows they would act as a separator or a drive prefix.
    pub fn parse(raw: &str) -> Result<Self, InvalidPath> {
        if raw.is_empty() {
            return Err(InvalidPath::Empty);
        }

        if raw.starts_with('/') || raw.starts_with('\\') {
            return Err(InvalidPath::Absolute(raw.to_owned()));
        }

        for segment in raw.split('/') {
            match segment {
                "" => return Err(InvalidPath::EmptySegment(raw.to_owned())),
                "." | ".." => return Err(InvalidPath::Traversal(raw.to_owned())),
                s if s.contains(['\\', ':']) => {
                    return Err(InvalidPath::Reserved(raw.to_owned()));
                }
                _ => {}
            }
        }

        Ok(Self(raw.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Where this resource lives under `root`.
    pub fn local_path(&self, root: &Path) -> PathBuf {
        self.0
            .split('/')
            .fold(root.to_path_buf(), |path, segment| path.join(segment))
    }

    /// Final segment, used for progress messages.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An image resource and the annotation describing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePair {
    pub image: ResourcePath,
    pub annotation: ResourcePath,
}

/// How a response body is decoded and persisted.
///
/// Chosen by the caller; the server's declared content type is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentKind {
    /// Written byte-for-byte.
    #[default]
    Raw,
    /// Decoded as an image and re-encoded to JPEG.
    Image,
    /// Decoded as UTF-8 text.
    Text,
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Image => write!(f, "image"),
            Self::Text => write!(f, "text"),
        }
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" | "bytes" => Ok(Self::Raw),
            "image" | "img" => Ok(Self::Image),
            "text" | "annotation" => Ok(Self::Text),
            other => Err(format!(
                "unknown content kind '{other}' (expected raw, image, or text)"
            )),
        }
    }
}
