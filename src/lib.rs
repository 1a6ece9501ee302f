//! Local credential store with a password generator and strength classifier.
//!
//! [`RecordStore`] owns the credential records and writes them through a
//! [`StorageBackend`] after every change. The [`generators`] module is
//! independent of the store.

pub mod catalog;
pub mod cli;
pub mod core;
pub mod generators;
pub mod models;
pub mod storage;
pub mod utils;

pub use crate::core::{Config, LoadOutcome, RecordStore, StoreError};
pub use crate::storage::{Storage, StorageBackend, StorageError};
