//! Statement arguments.
//!
//! Positional arguments are a `Vec<QueryParam>`; named arguments are a single
//! [`NamedArgs`] container whose fields are looked up by placeholder name.

use crate::error::{DbError, DbResult};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// A parameter value for parameterized statements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryParam {
    /// NULL value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value (stored as i64 for maximum range)
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String value
    String(String),
    /// Binary data (base64 encoded in JSON)
    #[serde(with = "base64_bytes")]
    Bytes(Vec<u8>),
    /// JSON document; stored as text on SQLite
    Json(JsonValue),
}

impl QueryParam {
    /// Convert a JSON value taken from a named-argument container.
    ///
    /// Scalars map onto their natural variant; arrays and objects are bound
    /// as JSON documents. Unsigned integers above `i64::MAX` have no lossless
    /// parameter type and are rejected.
    pub fn from_json(value: &JsonValue) -> DbResult<Self> {
        Ok(match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(*b),
            JsonValue::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Self::Int(i),
                (None, Some(f)) if n.is_f64() => Self::Float(f),
                _ => {
                    return Err(DbError::bind(format!(
                        "integer out of range for a 64-bit signed parameter: {n}"
                    )));
                }
            },
            JsonValue::String(s) => Self::String(s.clone()),
            JsonValue::Array(_) | JsonValue::Object(_) => Self::Json(value.clone()),
        })
    }
}

macro_rules! impl_from_int {
    ($($t:ty),+) => {
        $(
            impl From<$t> for QueryParam {
                fn from(v: $t) -> Self {
                    Self::Int(i64::from(v))
                }
            }
        )+
    };
}

impl_from_int!(i8, i16, i32, i64, u8, u16, u32);

impl From<bool> for QueryParam {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<f32> for QueryParam {
    fn from(v: f32) -> Self {
        Self::Float(f64::from(v))
    }
}

impl From<f64> for QueryParam {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for QueryParam {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for QueryParam {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&String> for QueryParam {
    fn from(v: &String) -> Self {
        Self::String(v.clone())
    }
}

impl From<Vec<u8>> for QueryParam {
    fn from(v: Vec<u8>) -> Self {
        Self::Bytes(v)
    }
}

impl From<&[u8]> for QueryParam {
    fn from(v: &[u8]) -> Self {
        Self::Bytes(v.to_vec())
    }
}

impl From<JsonValue> for QueryParam {
    fn from(v: JsonValue) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<QueryParam>> From<Option<T>> for QueryParam {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Build a `Vec<QueryParam>` from heterogeneous values.
///
/// ```
/// use sqlx_ops::params;
///
/// let args = params![1, "alice", Some(2.5), None::<i64>];
/// assert_eq!(args.len(), 4);
/// ```
#[macro_export]
macro_rules! params {
    () => {
        ::std::vec::Vec::<$crate::models::QueryParam>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::models::QueryParam::from($value)),+]
    };
}

/// Custom serialization for binary data as base64.
mod base64_bytes {
    use base64::{Engine as _, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(bytes: &Vec<u8>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        STANDARD.encode(bytes).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

/// A single named-argument container.
///
/// Holds any JSON value; binding only succeeds when it is an object, so the
/// shape check happens when the statement is expanded, not when the container
/// is built. A value that fails to serialize in [`NamedArgs::with`] is
/// reported the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedArgs {
    value: JsonValue,
    #[serde(skip)]
    error: Option<String>,
}

impl NamedArgs {
    /// An empty object.
    pub fn new() -> Self {
        Self::from(JsonValue::Object(serde_json::Map::new()))
    }

    /// Build a container from any serializable value (usually a struct or map).
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> DbResult<Self> {
        serde_json::to_value(value)
            .map(Self::from)
            .map_err(|e| DbError::bind(format!("failed to serialize named arguments: {e}")))
    }

    /// Add or replace one field. Turns a non-object container into an object.
    ///
    /// If `value` cannot be serialized the first such error is kept and
    /// returned by [`lookup`](Self::lookup), so the statement never runs.
    pub fn with(mut self, name: impl Into<String>, value: impl Serialize) -> Self {
        let name = name.into();
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                self.error
                    .get_or_insert_with(|| format!("failed to serialize argument '{name}': {e}"));
                return self;
            }
        };
        if !self.value.is_object() {
            self.value = JsonValue::Object(serde_json::Map::new());
        }
        if let JsonValue::Object(map) = &mut self.value {
            map.insert(name, value);
        }
        self
    }

    /// The raw container.
    pub fn as_json(&self) -> &JsonValue {
        &self.value
    }

    /// Resolve a possibly dotted name (`address.city`) against the container.
    ///
    /// Fails when the container is not an object or when an earlier
    /// [`with`](Self::with) could not serialize its value.
    pub fn lookup(&self, name: &str) -> DbResult<Option<&JsonValue>> {
        if let Some(error) = &self.error {
            return Err(DbError::bind(error.clone()));
        }
        let JsonValue::Object(root) = &self.value else {
            return Err(DbError::bind(format!(
                "unsupported named argument container: expected an object, got {}",
                json_kind(&self.value)
            )));
        };

        let mut parts = name.split('.');
        let Some(first) = parts.next() else {
            return Ok(None);
        };
        let mut current = root.get(first);
        for part in parts {
            current = current.and_then(|v| v.get(part));
        }
        Ok(current)
    }
}

impl Default for NamedArgs {
    fn default() -> Self {
        Self::new()
    }
}

impl From<JsonValue> for NamedArgs {
    fn from(value: JsonValue) -> Self {
        Self { value, error: None }
    }
}

fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_params_macro() {
        let args = params![7, "bob", 1.5, true, None::<String>, vec![1u8, 2]];
        assert_eq!(
            args,
            vec![
                QueryParam::Int(7),
                QueryParam::String("bob".to_string()),
                QueryParam::Float(1.5),
                QueryParam::Bool(true),
                QueryParam::Null,
                QueryParam::Bytes(vec![1, 2]),
            ]
        );
        assert!(params![].is_empty());
    }

    #[test]
    fn test_from_json() {
        assert_eq!(QueryParam::from_json(&json!(null)).unwrap(), QueryParam::Null);
        assert_eq!(QueryParam::from_json(&json!(3)).unwrap(), QueryParam::Int(3));
        assert_eq!(
            QueryParam::from_json(&json!(0.25)).unwrap(),
            QueryParam::Float(0.25)
        );
        assert_eq!(
            QueryParam::from_json(&json!({"a": 1})).unwrap(),
            QueryParam::Json(json!({"a": 1}))
        );
    }

    #[test]
    fn test_from_json_rejects_unsigned_overflow() {
        let max = QueryParam::from_json(&json!(i64::MAX as u64)).unwrap();
        assert_eq!(max, QueryParam::Int(i64::MAX));

        let err = QueryParam::from_json(&json!(u64::MAX - 1)).unwrap_err();
        assert!(matches!(err, DbError::Bind { .. }));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_default_is_empty_object() {
        assert_eq!(NamedArgs::default(), NamedArgs::new());
        assert_eq!(NamedArgs::default().lookup("missing").unwrap(), None);
    }

    #[test]
    fn test_with_keeps_serialization_error() {
        // JSON object keys must be strings
        let mut bad = std::collections::HashMap::new();
        bad.insert((1, 2), 3);

        let args = NamedArgs::new().with("ok", 1).with("v", bad).with("later", 2);
        let err = args.lookup("ok").unwrap_err();
        assert!(matches!(err, DbError::Bind { .. }));
        assert!(err.to_string().contains("failed to serialize argument 'v'"));
        assert_eq!(args.as_json().get("v"), None);
    }

    #[test]
    fn test_bytes_serialize_as_base64() {
        let value = serde_json::to_value(QueryParam::Bytes(b"hi".to_vec())).unwrap();
        assert_eq!(value, json!("aGk="));
    }

    #[derive(Serialize)]
    struct Address {
        city: String,
    }

    #[derive(Serialize)]
    struct Person {
        name: String,
        age: u32,
        address: Address,
    }

    #[test]
    fn test_named_args_lookup() {
        let args = NamedArgs::from_serialize(&Person {
            name: "Ann".to_string(),
            age: 31,
            address: Address {
                city: "Oslo".to_string(),
            },
        })
        .unwrap();

        assert_eq!(args.lookup("name").unwrap(), Some(&json!("Ann")));
        assert_eq!(args.lookup("address.city").unwrap(), Some(&json!("Oslo")));
        assert_eq!(args.lookup("missing").unwrap(), None);
        assert_eq!(args.lookup("address.zip").unwrap(), None);
    }

    #[test]
    fn test_named_args_rejects_non_object() {
        let args = NamedArgs::from(json!([1, 2, 3]));
        let err = args.lookup("id").unwrap_err();
        assert!(matches!(err, DbError::Bind { .. }));
        assert!(err.to_string().contains("array"));
    }

    #[test]
    fn test_named_args_builder() {
        let args = NamedArgs::new().with("id", 5).with("tag", "x");
        assert_eq!(args.as_json(), &json!({"id": 5, "tag": "x"}));
    }
}
