//! Shared test fixtures for the knowledge base loader workspace.
//!
//! Dev-dependency only, never published.
//!
//! - [`kb`]: [`TestKnowledgeBase`] builder for on-disk knowledge trees

pub mod kb;

pub use kb::TestKnowledgeBase;
