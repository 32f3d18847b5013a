use std::path::{Path, PathBuf};

use image::DynamicImage;

use crate::codec;
use crate::resource::ContentKind;

/// A decoded response body, ready to persist.
#[derive(Debug, Clone)]
pub enum Payload {
    Raw(Vec<u8>),
    Image(DynamicImage),
    Text(String),
}

impl Payload {
    pub fn kind(&self) -> ContentKind {
        match self {
            Self::Raw(_) => ContentKind::Raw,
            Self::Image(_) => ContentKind::Image,
            Self::Text(_) => ContentKind::Text,
        }
    }
}

/// Errors that can occur while writing an artifact.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {}: {reason}", .path.display())]
    Encode { path: PathBuf, reason: String },
}

/// Write a payload to `path`, creating parent directories as needed.
///
/// Raw bytes and text are written verbatim; images are written as JPEG. The
/// payload is encoded before the file is opened. The write itself is not
/// atomic: an interrupted write leaves a truncated file behind.
pub async fn write_artifact(path: &Path, payload: &Payload) -> Result<(), WriteError> {
    let io_err = |source: std::io::Error| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };

    let encoded;
    let bytes: &[u8] = match payload {
        Payload::Raw(bytes) => bytes,
        Payload::Text(text) => text.as_bytes(),
        Payload::Image(image) => {
            encoded = codec::encode_jpeg(image).map_err(|e| WriteError::Encode {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
            &encoded
        }
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    tokio::fs::write(path, bytes).await.map_err(io_err)?;

    tracing::debug!(path = %path.display(), kind = %payload.kind(), bytes = bytes.len(), "wrote artifact");
    Ok(())
}
