//! Database handle adapter.
//!
//! This module is the boundary to `sqlx`:
//! - Pool and transaction handles implementing [`Ext`]
//! - Placeholder rebinding and named-argument expansion per dialect
//! - Parameter binding and row decoding
//! - Database dispatch macros for reducing code duplication

#[macro_use]
pub mod macros;
pub mod dialect;
pub mod ext;
pub mod named;
pub(crate) mod params;
pub mod pool;
pub mod rebind;
pub mod row;
pub mod transaction;

pub use dialect::{BindStyle, DatabaseType};
pub use ext::Ext;
pub use pool::Handle;
pub use row::{Row, ScanTarget};
pub use transaction::{DbTransaction, TxHandle};
