//! curator: resumable vector index builds with blue/green activation
//!
//! The pipeline reads pre-chunked text from a SQLite chunk table, embeds it
//! via an external HTTP embedding backend, and upserts the vectors into a
//! Qdrant collection one batch at a time. All build progress lives in a
//! single persisted ledger row, so any process can resume an interrupted
//! build from the last committed cursor. A completed build is promoted to
//! serve traffic with an atomic activation switch.

pub mod build;
pub mod config;
pub mod embed;
pub mod embedding_backend;
pub mod error;
pub mod meta;
pub mod store;
