//! Database dialects and their placeholder styles.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Supported database types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    PostgreSQL,
    /// Includes MariaDB
    MySQL,
    SQLite,
}

impl DatabaseType {
    /// Parse database type from a connection string.
    pub fn from_connection_string(connection_string: &str) -> Option<Self> {
        let lower = connection_string.to_lowercase();
        if lower.starts_with("postgres://") || lower.starts_with("postgresql://") {
            Some(Self::PostgreSQL)
        } else if lower.starts_with("mysql://") || lower.starts_with("mariadb://") {
            Some(Self::MySQL)
        } else if lower.starts_with("sqlite://") || lower.starts_with("sqlite:") {
            Some(Self::SQLite)
        } else {
            None
        }
    }

    /// Get the display name for this database type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PostgreSQL => "PostgreSQL",
            Self::MySQL => "MySQL",
            Self::SQLite => "SQLite",
        }
    }

    /// Placeholder syntax the driver expects.
    pub fn bind_style(&self) -> BindStyle {
        match self {
            Self::PostgreSQL => BindStyle::Dollar,
            Self::MySQL | Self::SQLite => BindStyle::Question,
        }
    }
}

impl std::fmt::Display for DatabaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Positional placeholder syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindStyle {
    /// `?`
    Question,
    /// `$1`, `$2`, ...
    Dollar,
}

impl BindStyle {
    /// Append the placeholder for the 1-based argument `index`.
    pub fn write_placeholder(&self, out: &mut String, index: usize) {
        match self {
            Self::Question => out.push('?'),
            Self::Dollar => {
                let _ = write!(out, "${index}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_connection_string() {
        assert_eq!(
            DatabaseType::from_connection_string("postgresql://localhost/db"),
            Some(DatabaseType::PostgreSQL)
        );
        assert_eq!(
            DatabaseType::from_connection_string("MariaDB://localhost/db"),
            Some(DatabaseType::MySQL)
        );
        assert_eq!(
            DatabaseType::from_connection_string("sqlite::memory:"),
            Some(DatabaseType::SQLite)
        );
        assert_eq!(DatabaseType::from_connection_string("redis://x"), None);
    }

    #[test]
    fn test_bind_style() {
        assert_eq!(DatabaseType::PostgreSQL.bind_style(), BindStyle::Dollar);
        assert_eq!(DatabaseType::MySQL.bind_style(), BindStyle::Question);
        assert_eq!(DatabaseType::SQLite.bind_style(), BindStyle::Question);
    }

    #[test]
    fn test_write_placeholder() {
        let mut out = String::new();
        BindStyle::Dollar.write_placeholder(&mut out, 12);
        BindStyle::Question.write_placeholder(&mut out, 13);
        assert_eq!(out, "$12?");
    }

    #[test]
    fn test_display() {
        assert_eq!(DatabaseType::SQLite.to_string(), "SQLite");
    }
}
