use thiserror::Error;

/// The declared type of a flag or positional parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgType {
    /// Any token, taken verbatim.
    String,
    /// `true`/`false` (also `1`/`0`, `t`/`f`, and their capitalized spellings).
    Bool,
    /// A signed 64 bit integer, optionally prefixed by `0x`, `0o` or `0b`.
    /// A bare leading zero is still decimal: `010` is ten, not eight.
    Int,
    /// Not a usable type; registering a field with this type fails.
    Invalid,
}

impl std::fmt::Display for ArgType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArgType::String => write!(f, "string"),
            ArgType::Bool => write!(f, "bool"),
            ArgType::Int => write!(f, "int"),
            ArgType::Invalid => write!(f, "invalid"),
        }
    }
}

/// A concrete value for one of the usable [`ArgType`]s.
///
/// Used both for declaring defaults and for holding the values bound during parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// A string value.
    String(String),
    /// A boolean value.
    Bool(bool),
    /// An integer value.
    Int(i64),
}

impl Value {
    /// The type this value belongs to.
    pub fn arg_type(&self) -> ArgType {
        match self {
            Value::String(_) => ArgType::String,
            Value::Bool(_) => ArgType::Bool,
            Value::Int(_) => ArgType::Int,
        }
    }

    /// The value a field of `arg_type` takes when no default is declared.
    /// There is no such value for [`ArgType::Invalid`].
    pub fn zero(arg_type: ArgType) -> Option<Value> {
        match arg_type {
            ArgType::String => Some(Value::String(String::default())),
            ArgType::Bool => Some(Value::Bool(false)),
            ArgType::Int => Some(Value::Int(0)),
            ArgType::Invalid => None,
        }
    }

    pub(crate) fn parse(arg_type: ArgType, token: &str) -> Result<Value, InvalidConversion> {
        let invalid = || InvalidConversion {
            token: token.to_string(),
            arg_type,
        };

        match arg_type {
            ArgType::String => Ok(Value::String(token.to_string())),
            ArgType::Bool => parse_bool(token).map(Value::Bool).ok_or_else(invalid),
            ArgType::Int => parse_int(token).map(Value::Int).ok_or_else(invalid),
            ArgType::Invalid => Err(invalid()),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::String(value) => write!(f, "{value}"),
            Value::Bool(value) => write!(f, "{value}"),
            Value::Int(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

/// A token which does not convert to the declared [`ArgType`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("cannot convert '{token}' to {arg_type}.")]
pub struct InvalidConversion {
    /// The offending token.
    pub token: String,
    /// The type it was meant to convert to.
    pub arg_type: ArgType,
}

fn parse_bool(token: &str) -> Option<bool> {
    match token {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn parse_int(token: &str) -> Option<i64> {
    let (negative, unsigned) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let (radix, digits) = match unsigned.get(..2) {
        Some("0x") | Some("0X") => (16, &unsigned[2..]),
        Some("0o") | Some("0O") => (8, &unsigned[2..]),
        Some("0b") | Some("0B") => (2, &unsigned[2..]),
        _ => (10, unsigned),
    };

    // from_str_radix tolerates a leading '+', which would let "++1" through.
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }

    let magnitude = u64::from_str_radix(digits, radix).ok()?;

    if negative {
        if magnitude > i64::MAX as u64 + 1 {
            None
        } else {
            Some((magnitude as i64).wrapping_neg())
        }
    } else {
        i64::try_from(magnitude).ok()
    }
}

/// What to do when a sub-command's flags fail to parse.
///
/// Mirrors the error handling modes of conventional flag sets.
/// In every mode the error and the sub-command usage are printed first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorHandling {
    /// Return the error to the caller of `parse`.
    #[default]
    ContinueOnError,
    /// Exit the process: code `0` when help was requested, `2` otherwise.
    ExitOnError,
    /// Panic with the error message.
    PanicOnError,
}
