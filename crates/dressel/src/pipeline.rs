use std::path::{Path, PathBuf};

use indicatif::ProgressBar;

use crate::fetch::{FetchError, FetchOutcome, ResourceSource};
use crate::mirror::{self, Payload, WriteError};
use crate::resource::{ContentKind, ResourcePair, ResourcePath};

/// Fatal conditions that abort a mirror run.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("server returned HTTP {status} for {path}")]
    Protocol { path: ResourcePath, status: u16 },

    #[error("fetching {path} failed: {source}")]
    Fetch {
        path: ResourcePath,
        #[source]
        source: FetchError,
    },

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("could not check {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What a completed run did, entry by entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MirrorReport {
    /// Entries fetched and written.
    pub fetched: u64,
    /// Entries whose artifacts were already on disk.
    pub skipped_existing: u64,
    /// Entries the archive answered with 404, in manifest order.
    pub not_found: Vec<ResourcePath>,
}

/// Mirrors manifest entries from a [`ResourceSource`] into a local directory.
///
/// Entries are processed strictly in order, one request at a time. An
/// artifact's existence is the only resume signal: a file left truncated by an
/// interrupted run is treated as complete.
pub struct Mirror<'a, S: ResourceSource + ?Sized> {
    source: &'a S,
    root: PathBuf,
    skip_existing: bool,
    progress: ProgressBar,
}

impl<'a, S: ResourceSource + ?Sized> Mirror<'a, S> {
    pub fn new(source: &'a S, root: impl Into<PathBuf>) -> Self {
        Self {
            source,
            root: root.into(),
            skip_existing: true,
            progress: ProgressBar::hidden(),
        }
    }

    /// Whether entries with an existing local artifact are skipped. Defaults to true.
    pub fn skip_existing(mut self, skip: bool) -> Self {
        self.skip_existing = skip;
        self
    }

    /// Advance `progress` once per entry. Its length is left to the caller.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Mirror a single-list manifest, decoding every entry as `kind`.
    pub async fn pull(
        &self,
        entries: &[ResourcePath],
        kind: ContentKind,
    ) -> Result<MirrorReport, MirrorError> {
        tracing::info!(
            source = self.source.label(),
            root = %self.root.display(),
            entries = entries.len(),
            %kind,
            "starting pull"
        );

        let mut report = MirrorReport::default();

        for entry in entries {
            self.progress.set_message(entry.file_name().to_owned());
            let dest = entry.local_path(&self.root);

            if self.skip_existing && self.exists(&dest).await? {
                report.skipped_existing += 1;
                self.progress.inc(1);
                continue;
            }

            match self.fetch(entry, kind).await? {
                Some(payload) => {
                    mirror::write_artifact(&dest, &payload).await?;
                    report.fetched += 1;
                }
                None => report.not_found.push(entry.clone()),
            }
            self.progress.inc(1);
        }

        Ok(report)
    }

    /// Mirror a dual-list manifest: each image is written as JPEG and its
    /// annotation as text.
    ///
    /// A pair is a unit. If either half is missing remotely, neither half is
    /// written and the missing half is reported as not found.
    pub async fn pull_pairs(&self, pairs: &[ResourcePair]) -> Result<MirrorReport, MirrorError> {
        tracing::info!(
            source = self.source.label(),
            root = %self.root.display(),
            pairs = pairs.len(),
            "starting paired pull"
        );

        let mut report = MirrorReport::default();

        for pair in pairs {
            self.progress.set_message(pair.image.file_name().to_owned());
            let image_dest = pair.image.local_path(&self.root);
            let annotation_dest = pair.annotation.local_path(&self.root);

            let need_image = !(self.skip_existing && self.exists(&image_dest).await?);
            let need_annotation = !(self.skip_existing && self.exists(&annotation_dest).await?);

            if !need_image && !need_annotation {
                report.skipped_existing += 1;
                self.progress.inc(1);
                continue;
            }

            let image = if need_image {
                match self.fetch(&pair.image, ContentKind::Image).await? {
                    Some(payload) => Some(payload),
                    None => {
                        report.not_found.push(pair.image.clone());
                        self.progress.inc(1);
                        continue;
                    }
                }
            } else {
                None
            };

            let annotation = if need_annotation {
                match self.fetch(&pair.annotation, ContentKind::Text).await? {
                    Some(payload) => Some(payload),
                    None => {
                        report.not_found.push(pair.annotation.clone());
                        self.progress.inc(1);
                        continue;
                    }
                }
            } else {
                None
            };

            if let Some(payload) = &image {
                mirror::write_artifact(&image_dest, payload).await?;
            }
            if let Some(payload) = &annotation {
                mirror::write_artifact(&annotation_dest, payload).await?;
            }
            report.fetched += 1;
            self.progress.inc(1);
        }

        Ok(report)
    }

    /// Fetch one entry. `None` means the archive has no such resource.
    async fn fetch(
        &self,
        path: &ResourcePath,
        kind: ContentKind,
    ) -> Result<Option<Payload>, MirrorError> {
        let outcome = self
            .source
            .fetch(path, kind)
            .await
            .map_err(|source| MirrorError::Fetch {
                path: path.clone(),
                source,
            })?;

        match outcome {
            FetchOutcome::Success(payload) => Ok(Some(payload)),
            FetchOutcome::NotFound => {
                self.progress
                    .suspend(|| tracing::warn!(path = %path, "not found on server, skipping"));
                Ok(None)
            }
            FetchOutcome::ProtocolError { status } => Err(MirrorError::Protocol {
                path: path.clone(),
                status,
            }),
        }
    }

    async fn exists(&self, path: &Path) -> Result<bool, MirrorError> {
        tokio::fs::try_exists(path)
            .await
            .map_err(|source| MirrorError::Io {
                path: path.to_path_buf(),
                source,
            })
    }
}
