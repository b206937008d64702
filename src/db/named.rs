//! Named-argument expansion.
//!
//! `:name` placeholders are replaced with the dialect's positional syntax and
//! the matching values are pulled out of a [`NamedArgs`] container, in
//! statement order. A name may repeat; it is bound once per occurrence.
//!
//! - `::` is copied through, so PostgreSQL casts (`:id::int`) keep working.
//! - Names are `[A-Za-z_][A-Za-z0-9_]*`, optionally dotted (`:user.id`) to
//!   reach into nested objects.
//! - Quoted text and comments are never scanned.

use crate::db::dialect::BindStyle;
use crate::db::rebind::skip_literal;
use crate::error::{DbError, DbResult};
use crate::models::{NamedArgs, QueryParam};

/// A statement with its named placeholders replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledNamed {
    pub sql: String,
    /// Placeholder names in binding order.
    pub names: Vec<String>,
}

/// Replace `:name` placeholders with positional ones.
pub fn compile_named(style: BindStyle, sql: &str) -> CompiledNamed {
    let bytes = sql.as_bytes();
    let mut out = String::with_capacity(sql.len());
    let mut names = Vec::new();
    let mut last = 0;
    let mut i = 0;

    while i < bytes.len() {
        if let Some(end) = skip_literal(bytes, i) {
            i = end;
            continue;
        }
        if bytes[i] != b':' {
            i += 1;
            continue;
        }
        if bytes.get(i + 1) == Some(&b':') {
            i += 2;
            continue;
        }
        let start = i + 1;
        if !bytes.get(start).is_some_and(|b| is_name_start(*b)) {
            i += 1;
            continue;
        }

        let mut end = start + 1;
        while end < bytes.len() && is_name_char(bytes[end]) {
            end += 1;
        }
        // ":a.b." keeps the trailing dot as statement text
        while bytes[end - 1] == b'.' {
            end -= 1;
        }

        out.push_str(&sql[last..i]);
        names.push(sql[start..end].to_string());
        style.write_placeholder(&mut out, names.len());
        i = end;
        last = end;
    }

    out.push_str(&sql[last..]);
    CompiledNamed { sql: out, names }
}

/// Expand `sql` against `args` into a positional statement and argument list.
pub fn bind_named(
    style: BindStyle,
    sql: &str,
    args: &NamedArgs,
) -> DbResult<(String, Vec<QueryParam>)> {
    let compiled = compile_named(style, sql);
    let mut params = Vec::with_capacity(compiled.names.len());
    for name in &compiled.names {
        let value = args
            .lookup(name)?
            .ok_or_else(|| DbError::bind(format!("could not find name '{name}' in args")))?;
        params.push(QueryParam::from_json(value)?);
    }
    Ok((compiled.sql, params))
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_name_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'.'
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compile_question() {
        let c = compile_named(
            BindStyle::Question,
            "INSERT INTO users (id, name) VALUES (:id, :name)",
        );
        assert_eq!(c.sql, "INSERT INTO users (id, name) VALUES (?, ?)");
        assert_eq!(c.names, vec!["id", "name"]);
    }

    #[test]
    fn test_compile_dollar_with_repeat() {
        let c = compile_named(
            BindStyle::Dollar,
            "SELECT * FROM t WHERE a = :x OR b = :x AND c = :y",
        );
        assert_eq!(c.sql, "SELECT * FROM t WHERE a = $1 OR b = $2 AND c = $3");
        assert_eq!(c.names, vec!["x", "x", "y"]);
    }

    #[test]
    fn test_cast_and_literals_untouched() {
        let c = compile_named(
            BindStyle::Dollar,
            "SELECT :id::int, '10:30', col::text -- :nope\nFROM t",
        );
        assert_eq!(c.sql, "SELECT $1::int, '10:30', col::text -- :nope\nFROM t");
        assert_eq!(c.names, vec!["id"]);
    }

    #[test]
    fn test_dotted_names_and_trailing_dot() {
        let c = compile_named(BindStyle::Question, "WHERE city = :addr.city.");
        assert_eq!(c.sql, "WHERE city = ?.");
        assert_eq!(c.names, vec!["addr.city"]);
    }

    #[test]
    fn test_lone_colon_and_digits() {
        let c = compile_named(BindStyle::Question, "SELECT arr[1:2], : FROM t");
        assert_eq!(c.sql, "SELECT arr[1:2], : FROM t");
        assert!(c.names.is_empty());
    }

    #[test]
    fn test_bind_named_values() {
        let args = NamedArgs::from(json!({"id": 7, "name": "bo", "meta": {"k": true}}));
        let (sql, params) = bind_named(
            BindStyle::Dollar,
            "UPDATE t SET name = :name, flag = :meta.k WHERE id = :id",
            &args,
        )
        .unwrap();
        assert_eq!(sql, "UPDATE t SET name = $1, flag = $2 WHERE id = $3");
        assert_eq!(
            params,
            vec![
                QueryParam::String("bo".to_string()),
                QueryParam::Bool(true),
                QueryParam::Int(7),
            ]
        );
    }

    #[test]
    fn test_bind_named_missing_name() {
        let args = NamedArgs::from(json!({"id": 1}));
        let err = bind_named(BindStyle::Question, "WHERE id = :id AND x = :x", &args).unwrap_err();
        assert!(matches!(err, DbError::Bind { .. }));
        assert!(err.to_string().contains("'x'"));
    }

    #[test]
    fn test_bind_named_unsupported_shape() {
        let args = NamedArgs::from(json!("scalar"));
        let err = bind_named(BindStyle::Question, "WHERE id = :id", &args).unwrap_err();
        assert!(err.to_string().contains("expected an object"));
    }

    #[test]
    fn test_bind_named_without_placeholders_ignores_shape() {
        let args = NamedArgs::from(json!([1]));
        let (sql, params) = bind_named(BindStyle::Question, "DELETE FROM t", &args).unwrap();
        assert_eq!(sql, "DELETE FROM t");
        assert!(params.is_empty());
    }

    #[derive(serde::Serialize)]
    struct Counter {
        id: u64,
    }

    #[test]
    fn test_bind_named_rejects_lossy_integer() {
        let args = NamedArgs::from_serialize(&Counter { id: u64::MAX - 1 }).unwrap();
        let err = bind_named(BindStyle::Dollar, "SELECT :id", &args).unwrap_err();
        assert!(matches!(err, DbError::Bind { .. }));

        let args = NamedArgs::from_serialize(&Counter { id: 42 }).unwrap();
        let (_, params) = bind_named(BindStyle::Dollar, "SELECT :id", &args).unwrap();
        assert_eq!(params, vec![QueryParam::Int(42)]);
    }

    #[test]
    fn test_bind_named_surfaces_unserializable_value() {
        let mut bad = std::collections::HashMap::new();
        bad.insert((1, 2), 3);
        let args = NamedArgs::new().with("v", bad);
        let err = bind_named(BindStyle::Question, "INSERT INTO t (v) VALUES (:v)", &args)
            .unwrap_err();
        assert!(matches!(err, DbError::Bind { .. }));
    }

    #[test]
    fn test_dollar_quoted_body_untouched() {
        let c = compile_named(
            BindStyle::Dollar,
            "DO $body$ BEGIN PERFORM :x; END $body$; SELECT :y",
        );
        assert_eq!(c.sql, "DO $body$ BEGIN PERFORM :x; END $body$; SELECT $1");
        assert_eq!(c.names, vec!["y"]);
    }
}
