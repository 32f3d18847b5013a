pub mod codec;
pub mod fetch;
pub mod manifest;
pub mod mirror;
pub mod pipeline;
pub mod resource;

pub use fetch::{FetchError, FetchOutcome, ResourceSource};
pub use manifest::{ManifestError, load_pairs, load_suffixes, pair_suffixes, parse_suffixes};
pub use mirror::{Payload, WriteError, write_artifact};
pub use pipeline::{Mirror, MirrorError, MirrorReport};
pub use resource::{ContentKind, InvalidPath, ResourcePair, ResourcePath};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
