//! Bounded, persisted prompt history.
//!
//! - [`storage`] defines the [`KeyValueStorage`] port and its backends.
//! - [`store::HistoryStore`] keeps the newest-first record list, enforces
//!   capacity and persists every mutation on a best-effort basis.
//! - [`controller::HistoryController`] runs a generation and records the
//!   result, exposing a pending flag while the call is in flight.

pub mod controller;
pub mod storage;
pub mod store;

pub use controller::HistoryController;
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, PersistenceError, SledStorage};
pub use store::HistoryStore;
