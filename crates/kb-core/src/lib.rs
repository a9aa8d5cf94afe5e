//! Knowledge base loading and snapshot reconciliation
//!
//! `kb-core` sits between the filesystem layer and the CLI:
//!
//! ```text
//!        kb-cli
//!          |
//!       kb-core   config -> layout -> fingerprint / ingest -> snapshot
//!          |
//!        kb-fs
//! ```
//!
//! The [`Reconciler`] decides whether the persisted [`Snapshot`] still
//! describes the files on disk and rebuilds it when it does not.
//!
//! # Example
//!
//! ```no_run
//! use kb_core::Reconciler;
//! use std::path::Path;
//!
//! fn refresh() -> kb_core::Result<()> {
//!     let reconciler = Reconciler::open(Path::new("."))?;
//!     let outcome = reconciler.check_and_reload_if_stale()?;
//!     println!("reloaded: {}", outcome.reloaded);
//!     Ok(())
//! }
//! ```

pub mod activation;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod ingest;
pub mod layout;
pub mod reconciler;
pub mod snapshot;

pub use activation::{Activation, ProfileHook};
pub use config::{LoaderConfig, RootSpec, SchemaRoot};
pub use error::{Error, FileFailure, Result};
pub use fingerprint::{FingerprintDiff, FingerprintSet};
pub use ingest::{Card, CoreDoc, KnowledgeBase};
pub use layout::{Discovery, SourceFile, SourceKind, SourceLayout};
pub use reconciler::{Reconciler, Reconciliation, Reloaded, Staleness, needs_reload};
pub use snapshot::{FORMAT_VERSION, Snapshot, SnapshotStatus, SnapshotStore, SummaryCounts};
