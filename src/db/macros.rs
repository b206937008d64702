//! Database dispatch macros for reducing code duplication.
//!
//! Handles, transactions and rows are all three-variant enums over the
//! MySQL, PostgreSQL and SQLite drivers. These macros generate the match so
//! each call site reads as one arm per backend.

/// Macro for generating database dispatch match arms.
///
/// The first argument names an enum re-exported from `crate::db`.
///
/// # Example
///
/// ```ignore
/// impl_db_dispatch!(Handle, self, {
///     MySql(p) => do_mysql(p),
///     Postgres(p) => do_postgres(p),
///     SQLite(p) => do_sqlite(p),
/// });
/// ```
macro_rules! impl_db_dispatch {
    ($enum:ident, $value:expr, { $($variant:ident($p:ident) => $body:expr),+ $(,)? }) => {
        match $value {
            $(
                crate::db::$enum::$variant($p) => $body,
            )+
        }
    };
}
