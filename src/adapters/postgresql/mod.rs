//! PostgreSQL database integration
//!
//! Loads normalized records into the six relational tables inside a single
//! server-side transaction.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
pub use models::InsertRow;
