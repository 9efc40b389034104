use crate::api::FieldDescriptor;
use crate::model::{ArgType, Value};

/// A view of one bound field: its value together with the [`FieldDescriptor`] that declared it.
///
/// Exactly one of [`as_string`](TypedValue::as_string), [`as_bool`](TypedValue::as_bool) and [`as_int`](TypedValue::as_int) returns `Some`.
///
/// ### Example
/// ```
/// use modcli::{CommandLineInterface, ErrorHandling, Flag, SubCommand, TypedValue};
///
/// let mut cli = CommandLineInterface::new();
/// cli.register(
///     "run",
///     SubCommand::new(ErrorHandling::ContinueOnError).flag(Flag::int("count").default(4)),
/// )
/// .unwrap();
///
/// let command = cli.parse_tokens(&["prog", "run", "--count", "7"]).unwrap();
/// let count = command.flag("count").unwrap();
/// assert_eq!(count.as_int(), Some(7));
/// assert_eq!(count.as_string(), None);
/// assert_eq!(count.as_bool(), None);
///
/// match count {
///     TypedValue::Int { value, descriptor } => {
///         assert_eq!(value, 7);
///         assert_eq!(descriptor.name(), "count");
///     }
///     _ => unreachable!(),
/// }
/// ```
#[derive(Debug, Clone, Copy)]
pub enum TypedValue<'a> {
    /// A bound string.
    String {
        /// The bound value.
        value: &'a str,
        /// The declaration of the field.
        descriptor: &'a FieldDescriptor,
    },
    /// A bound bool.
    Bool {
        /// The bound value.
        value: bool,
        /// The declaration of the field.
        descriptor: &'a FieldDescriptor,
    },
    /// A bound int.
    Int {
        /// The bound value.
        value: i64,
        /// The declaration of the field.
        descriptor: &'a FieldDescriptor,
    },
}

impl<'a> TypedValue<'a> {
    pub(crate) fn bind(descriptor: &'a FieldDescriptor, value: &'a Value) -> Self {
        match value {
            Value::String(value) => TypedValue::String {
                value: value.as_str(),
                descriptor,
            },
            Value::Bool(value) => TypedValue::Bool {
                value: *value,
                descriptor,
            },
            Value::Int(value) => TypedValue::Int {
                value: *value,
                descriptor,
            },
        }
    }

    /// The value, if this is a string.
    pub fn as_string(&self) -> Option<&'a str> {
        match self {
            TypedValue::String { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// The value, if this is a bool.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Bool { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// The value, if this is an int.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            TypedValue::Int { value, .. } => Some(*value),
            _ => None,
        }
    }

    /// The declaration of the field, regardless of the variant.
    pub fn descriptor(&self) -> &'a FieldDescriptor {
        match self {
            TypedValue::String { descriptor, .. }
            | TypedValue::Bool { descriptor, .. }
            | TypedValue::Int { descriptor, .. } => *descriptor,
        }
    }

    /// Shorthand for `descriptor().name()`.
    pub fn name(&self) -> &'a str {
        self.descriptor().name()
    }

    /// The type of the bound value.
    pub fn arg_type(&self) -> ArgType {
        match self {
            TypedValue::String { .. } => ArgType::String,
            TypedValue::Bool { .. } => ArgType::Bool,
            TypedValue::Int { .. } => ArgType::Int,
        }
    }

    /// An owned copy of the bound value.
    pub fn to_value(&self) -> Value {
        match self {
            TypedValue::String { value, .. } => Value::String(value.to_string()),
            TypedValue::Bool { value, .. } => Value::Bool(*value),
            TypedValue::Int { value, .. } => Value::Int(*value),
        }
    }
}

impl<'a> std::fmt::Display for TypedValue<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypedValue::String { value, .. } => write!(f, "{value}"),
            TypedValue::Bool { value, .. } => write!(f, "{value}"),
            TypedValue::Int { value, .. } => write!(f, "{value}"),
        }
    }
}
