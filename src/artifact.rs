//! Chart artifacts
//!
//! The plot service writes a chart under a key derived from the request time and
//! the conversation reads it back from the same key. Both sides derive the
//! key from one `issued_at` value handed out by the gateway.

mod key;
mod store;

pub use key::{format_issued_at, key_for, parse_issued_at, ArtifactKey};
pub use store::{
    ArtifactStore, MemoryArtifactStore, S3ArtifactStore, StorageCredentials, StorageError,
};
