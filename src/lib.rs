//! # TinyTable
//!
//! A fixed-schema row/column table layered on an embedded ordered
//! key-value store:
//! - Collision-free (row, column) → key encoding
//! - A column schema that survives restarts without touching user data
//! - Row and element CRUD driven from a line-oriented console
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Console (CommandSource)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ (operation, args)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │          TinyTable  ── SchemaStore ── key codec             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ get / put / delete  (KvStore)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Engine                               │
//! └──────────┬──────────────────────────────┬───────────────────┘
//!            ▼                              ▼
//!     ┌─────────────┐                ┌─────────────┐
//!     │     WAL     │                │  MemTable   │
//!     └─────────────┘                └──────┬──────┘
//!                                           ▼
//!                                   ┌───────────────┐
//!                                   │   SSTables    │
//!                                   │ (+ bloom)     │
//!                                   └───────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod engine;
pub mod kv;
pub mod memtable;
pub mod storage;
pub mod wal;

pub mod console;
pub mod table;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use engine::Engine;
pub use error::{Result, TinyTableError};
pub use kv::KvStore;
pub use table::{Operation, Reply, TinyTable};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of TinyTable
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
