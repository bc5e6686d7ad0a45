//! Claim storage for the claim intake service
//!
//! Every accepted claim becomes one row keyed by a generated `uid`. Rows are
//! only ever written through a [`ClaimTransaction`] opened from a
//! [`ClaimStore`], which gives the batch endpoint its all-or-nothing
//! guarantee: staged rows become visible on `commit` and vanish on
//! `rollback` or drop.
//!
//! Two stores are provided:
//!
//! - [`PostgresClaimStore`]: `sqlx` pool and transactions, schema applied from
//!   the embedded migrations in `migrations/`
//! - [`InMemoryClaimStore`]: `DashMap` backed, for tests and local runs, with
//!   optional write-failure injection
//!
//! # Example
//!
//! ```rust
//! use database_layer::{ClaimStore, ClaimTransaction, InMemoryClaimStore};
//!
//! # async fn run() -> database_layer::DatabaseResult<()> {
//! let store = InMemoryClaimStore::new();
//! let tx = store.begin().await?;
//! tx.commit().await?;
//! assert_eq!(store.count().await?, 0);
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod models;
pub mod repository;
pub mod transaction;

pub use connection::*;
pub use error::*;
pub use models::*;
pub use repository::*;
pub use transaction::*;
