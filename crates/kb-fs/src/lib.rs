//! Filesystem layer for the knowledge base loader
//!
//! Provides the fingerprint engine (content digests and path identity keys),
//! the filesystem provider used for discovery and reads, and safe atomic I/O.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;
pub mod provider;

pub use checksum::{Digest, digest, digest_str};
pub use config::ConfigStore;
pub use constants::KbPath;
pub use error::{Error, Result};
pub use io::RobustnessConfig;
pub use path::{NormalizedPath, identity_key};
pub use provider::{FileProvider, LocalFs};
