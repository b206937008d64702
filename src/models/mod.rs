//! Data models.
//!
//! This module contains the argument and result types that flow through the
//! forwarding layer and the operation objects.

pub mod param;
pub mod result;

pub use param::{NamedArgs, QueryParam};
pub use result::ExecResult;
