use std::fmt;

use chrono::{DateTime, Utc};

/// Dynamically-typed value passed between documents, scripts and the
/// comparator.
///
/// Documents are parsed into this shape from YAML; script arguments are
/// marshalled into it at the engine boundary. Mapping entries preserve
/// insertion order and keys may be any value, matching what YAML allows.
#[derive(Debug, Clone, PartialEq)]
pub enum DocValue {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Seq(Vec<DocValue>),
    Map(Vec<(DocValue, DocValue)>),
    Timestamp(DateTime<Utc>),
    /// A function value that crossed the engine boundary. Never comparable.
    Callable(String),
    /// Any other engine-side custom type; the type name is kept for
    /// diagnostics.
    Opaque(String),
}

impl DocValue {
    pub fn type_name(&self) -> &str {
        match self {
            Self::Nil => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Seq(_) => "seq",
            Self::Map(_) => "map",
            Self::Timestamp(_) => "timestamp",
            Self::Callable(_) => "fn",
            Self::Opaque(name) => name.as_str(),
        }
    }

    /// Text form used for substring containment and for mapping keys at the
    /// engine boundary: strings yield their raw content, everything else its
    /// rendered form.
    pub fn text_form(&self) -> String {
        match self {
            Self::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for DocValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Nil => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Bytes(bytes) => {
                f.write_str("0x")?;
                for byte in bytes {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            Self::Seq(items) => {
                f.write_str("[")?;
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            Self::Map(entries) => {
                f.write_str("{")?;
                for (index, (key, value)) in entries.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Self::Timestamp(ts) => f.write_str(&ts.to_rfc3339()),
            Self::Callable(name) => write!(f, "<fn {name}>"),
            Self::Opaque(name) => write!(f, "<{name}>"),
        }
    }
}

impl From<serde_yaml::Value> for DocValue {
    fn from(value: serde_yaml::Value) -> Self {
        match value {
            serde_yaml::Value::Null => Self::Nil,
            serde_yaml::Value::Bool(b) => Self::Bool(b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Self::Int(i)
                } else {
                    Self::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_yaml::Value::String(s) => Self::Str(s),
            serde_yaml::Value::Sequence(items) => {
                Self::Seq(items.into_iter().map(Self::from).collect())
            }
            serde_yaml::Value::Mapping(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (Self::from(key), Self::from(value)))
                    .collect(),
            ),
            serde_yaml::Value::Tagged(tagged) => Self::from(tagged.value),
        }
    }
}

/// One parsed document plus the label it is reported under.
///
/// The label (file name or `stdin`) is carried for diagnostics only; it is
/// not part of the document's value.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub source: String,
    pub value: DocValue,
}
