//! # Soundclash Common Library
//!
//! Core of the battle voting system:
//! - Domain records (Battle, Entry, Votes) and scan descriptors
//! - Transactional vote store over SQLite
//! - Score aggregation and tie-aware placement ranking
//! - Deterministic shuffles for tie ordering and voting display
//! - Reconciliation of scanned entries against persisted identity

pub mod db;
pub mod error;
pub mod ranking;
pub mod reconcile;
pub mod shuffle;
pub mod sse;
pub mod types;

pub use db::{ReconcileSummary, Store};
pub use error::{Error, Result};
pub use types::{Battle, Entry, ScannedBattle, ScannedEntry, ScoreMap, Votes};
