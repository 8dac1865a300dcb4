//! Domain models and types for posload.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Normalized records** ([`Venue`], [`Store`], [`Transaction`], [`Product`],
//!   [`Item`], [`Promo`]) and their [`EntityKind`]
//! - **Error types** ([`PosloadError`], [`IngestError`], [`LoadError`],
//!   [`CoercionError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, PosloadError>`]:
//!
//! ```rust
//! use posload::domain::{PosloadError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = posload::config::load_config("posload.toml")?;
//!     Ok(())
//! }
//! ```

pub mod errors;
pub mod records;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{CoercionError, IngestError, LoadError, PosloadError};
pub use records::{EntityKind, Item, ItemKey, Product, Promo, Store, Transaction, Venue};
pub use result::Result;
