use image::DynamicImage;

use crate::codec;
use crate::mirror::Payload;
use crate::resource::{ContentKind, ResourcePath};

/// Errors that prevent a fetch from producing an outcome at all.
///
/// HTTP statuses are not errors here; they are reported through
/// [`FetchOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode {path}: {reason}")]
    Decode { path: ResourcePath, reason: String },

    #[error("client error: {0}")]
    Client(String),
}

/// Result of asking the archive for one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome<T> {
    /// Status 200 with the decoded body.
    Success(T),
    /// Status 404.
    NotFound,
    /// Any other status. Fatal to a run.
    ProtocolError { status: u16 },
}

impl<T> FetchOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            Self::Success(value) => FetchOutcome::Success(f(value)),
            Self::NotFound => FetchOutcome::NotFound,
            Self::ProtocolError { status } => FetchOutcome::ProtocolError { status },
        }
    }

    pub fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<FetchOutcome<U>, E> {
        Ok(match self {
            Self::Success(value) => FetchOutcome::Success(f(value)?),
            Self::NotFound => FetchOutcome::NotFound,
            Self::ProtocolError { status } => FetchOutcome::ProtocolError { status },
        })
    }
}

/// A remote archive addressed by path suffix.
///
/// Implementors only supply [`get`](ResourceSource::get); the typed fetches
/// are layered on top of it with the content decoders.
#[async_trait::async_trait]
pub trait ResourceSource: Send + Sync {
    /// Human-readable label identifying this archive.
    fn label(&self) -> &str;

    /// Fetch the raw body of one resource.
    async fn get(&self, path: &ResourcePath) -> Result<FetchOutcome<Vec<u8>>, FetchError>;

    async fn fetch_bytes(&self, path: &ResourcePath) -> Result<FetchOutcome<Vec<u8>>, FetchError> {
        self.get(path).await
    }

    async fn fetch_image(
        &self,
        path: &ResourcePath,
    ) -> Result<FetchOutcome<DynamicImage>, FetchError> {
        self.get(path)
            .await?
            .try_map(|body| codec::decode_image(path, &body))
    }

    async fn fetch_text(&self, path: &ResourcePath) -> Result<FetchOutcome<String>, FetchError> {
        self.get(path)
            .await?
            .try_map(|body| codec::decode_text(path, body))
    }

    /// Fetch and decode according to `kind`.
    async fn fetch(
        &self,
        path: &ResourcePath,
        kind: ContentKind,
    ) -> Result<FetchOutcome<Payload>, FetchError> {
        Ok(match kind {
            ContentKind::Raw => self.fetch_bytes(path).await?.map(Payload::Raw),
            ContentKind::Image => self.fetch_image(path).await?.map(Payload::Image),
            ContentKind::Text => self.fetch_text(path).await?.map(Payload::Text),
        })
    }
}
