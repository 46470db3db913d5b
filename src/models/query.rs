//! Query-related data models.
//!
//! This module defines parameter values and the bind list a connection keeps
//! for its last statement.

use serde::{Deserialize, Serialize};

/// A parameter value for parameterized queries.
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
}

impl QueryParam {
    /// Check if this parameter is null.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Check if this parameter is the empty string.
    pub fn is_empty_string(&self) -> bool {
        matches!(self, Self::String(s) if s.is_empty())
    }

    /// Get the type name of this parameter for debugging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
        }
    }
}

impl From<i64> for QueryParam {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for QueryParam {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<bool> for QueryParam {
    fn from(v: bool) -> Self {
        Self::Bool(v)
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

/// Driver-level type marker attached to a bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    Null,
    Bool,
    Int,
    Str,
    Lob,
    /// Float semantics; drivers receive it as `Str`
    Float,
}

/// How a bind addresses its placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BindKey {
    /// Zero-based position in the bind list
    Position(usize),
    Name(String),
}

/// One entry of a statement's bind list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bind {
    pub key: BindKey,
    pub value: QueryParam,
    #[serde(default)]
    pub param_type: Option<ParamType>,
}

impl Bind {
    /// Bind a value at a zero-based position.
    pub fn positional(index: usize, value: impl Into<QueryParam>) -> Self {
        Self {
            key: BindKey::Position(index),
            value: value.into(),
            param_type: None,
        }
    }

    /// Bind a value to a named placeholder (without the leading colon).
    pub fn named(name: impl Into<String>, value: impl Into<QueryParam>) -> Self {
        Self {
            key: BindKey::Name(name.into()),
            value: value.into(),
            param_type: None,
        }
    }

    /// Attach a type marker.
    pub fn with_type(mut self, param_type: ParamType) -> Self {
        self.param_type = Some(param_type);
        self
    }

    /// Placeholder this bind targets: 1-based for positions, `:name` for names.
    pub fn placeholder(&self) -> Placeholder {
        match &self.key {
            BindKey::Position(i) => Placeholder::Position(i + 1),
            BindKey::Name(n) => Placeholder::Name(format!(":{}", n)),
        }
    }

    /// Resolve the bind into what is handed to the driver.
    ///
    /// An `Int` marker with an empty string becomes `0`. A `Float` marker turns
    /// string values into floats and is re-marked `Str`.
    pub fn to_bound(&self) -> BoundParam {
        let (value, param_type) = match (self.param_type, &self.value) {
            (Some(ParamType::Int), v) if v.is_empty_string() => {
                (QueryParam::Int(0), Some(ParamType::Int))
            }
            (Some(ParamType::Float), QueryParam::String(s)) => {
                (QueryParam::Float(parse_float(s)), Some(ParamType::Str))
            }
            (Some(ParamType::Float), v) => (v.clone(), Some(ParamType::Str)),
            (t, v) => (v.clone(), t),
        };

        BoundParam {
            placeholder: self.placeholder(),
            value,
            param_type,
        }
    }
}

/// Driver-facing placeholder address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Placeholder {
    /// 1-based position
    Position(usize),
    /// Name including the leading colon
    Name(String),
}

impl std::fmt::Display for Placeholder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Position(n) => write!(f, "{}", n),
            Self::Name(n) => write!(f, "{}", n),
        }
    }
}

/// A bind after placeholder resolution and value coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParam {
    pub placeholder: Placeholder,
    pub value: QueryParam,
    pub param_type: Option<ParamType>,
}

/// Resolve a whole bind list in order.
pub fn bind_all(binds: &[Bind]) -> Vec<BoundParam> {
    binds.iter().map(Bind::to_bound).collect()
}

/// Numeric value of a string, reading the longest leading numeric prefix
/// (`[+-]digits[.digits][e[+-]digits]`). Input without leading digits yields
/// `0.0`; a prefix too large for `f64` yields infinity.
fn parse_float(s: &str) -> f64 {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_digits = digits_from(end);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = digits_from(end + 1);
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return 0.0;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_digits = digits_from(exp);
        if exp_digits > 0 {
            end = exp + exp_digits;
        }
    }

    s[..end].parse().unwrap_or(0.0)
}
