use thiserror::Error;

use crate::api::TypedValue;
use crate::model::{ArgType, Value};

/// A caller supplied check, run against the bound value after parsing.
pub type Validator = Box<dyn Fn(&TypedValue<'_>) -> Result<(), ValidationError>>;

/// The outcome of a failed [`Validator`].
/// Surfaces from parsing with its message untouched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ValidationError(String);

impl ValidationError {
    /// Create a validation error.
    ///
    /// ### Example
    /// ```
    /// use modcli::ValidationError;
    ///
    /// let error = ValidationError::new("filetype must be .ext");
    /// assert_eq!(error.to_string(), "filetype must be .ext");
    /// ```
    pub fn new(message: impl Into<String>) -> Self {
        ValidationError(message.into())
    }

    /// The message describing the failure.
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// The static declaration of a flag or positional parameter.
///
/// Built via [`Flag`] or [`Positional`], and owned by the registered sub-command thereafter.
pub struct FieldDescriptor {
    name: String,
    arg_type: ArgType,
    default: Option<Value>,
    required: bool,
    help: Option<String>,
    validator: Option<Validator>,
    position: Option<usize>,
}

impl FieldDescriptor {
    fn new(name: String, arg_type: ArgType, position: Option<usize>) -> Self {
        Self {
            name,
            arg_type,
            default: None,
            required: false,
            help: None,
            validator: None,
            position,
        }
    }

    /// The name of this field, unique within its sub-command.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared type of this field.
    pub fn arg_type(&self) -> ArgType {
        self.arg_type
    }

    /// The explicitly declared default, if any.
    /// Flags without one default to [`Value::zero`].
    pub fn default_value(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Whether the flag must appear on the command line.
    /// Always `true` for positionals.
    pub fn is_required(&self) -> bool {
        self.required || self.position.is_some()
    }

    /// The help message, if documented.
    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    /// The index into the tokens following the sub-command name; `None` for flags.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    /// Whether this field carries a validator.
    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    pub(crate) fn validate(&self, value: &TypedValue<'_>) -> Result<(), ValidationError> {
        match &self.validator {
            Some(validator) => validator(value),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (class, name) = match &self.position {
            Some(position) => ("Positional", format!("{n}@{position}", n = self.name)),
            None => ("Flag", format!("--{n}", n = self.name)),
        };
        let default = match &self.default {
            Some(value) => format!(", default={value}"),
            None => "".to_string(),
        };
        let required = if self.required { ", required" } else { "" };
        let validator = if self.validator.is_some() {
            ", validated"
        } else {
            ""
        };
        let help = match &self.help {
            Some(h) => format!(", {h}"),
            None => "".to_string(),
        };

        write!(
            f,
            "{class}[{t}, {name}{default}{required}{validator}{help}]",
            t = self.arg_type,
        )
    }
}

/// A flag, specified on the command line via `--NAME VALUE`, `--NAME=VALUE`, or `--NAME` for bools.
///
/// ### Example
/// ```
/// use modcli::{Flag, ValidationError};
///
/// let flag = Flag::string("file")
///     .default("")
///     .required()
///     .help("File to import (*.ext)")
///     .validator(|value| match value.as_string() {
///         Some(file) if file.ends_with(".ext") => Ok(()),
///         _ => Err(ValidationError::new("filetype must be .ext")),
///     });
/// ```
pub struct Flag(FieldDescriptor);

impl Flag {
    /// Create a flag of the given type.
    pub fn new(name: impl Into<String>, arg_type: ArgType) -> Self {
        Flag(FieldDescriptor::new(name.into(), arg_type, None))
    }

    /// Create a string flag.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ArgType::String)
    }

    /// Create a bool flag.
    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, ArgType::Bool)
    }

    /// Create an int flag.
    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, ArgType::Int)
    }

    /// Declare the value the flag holds when not specified.
    /// If repeated, only the final default will apply.
    ///
    /// The default must match the declared type, otherwise registration fails.
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.0.default.replace(value.into());
        self
    }

    /// Require the flag to be specified on the command line.
    pub fn required(mut self) -> Self {
        self.0.required = true;
        self
    }

    /// Document the help message for this flag.
    /// If repeated, only the final help message will apply.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.0.help.replace(description.into());
        self
    }

    /// Check the bound value once parsing is complete.
    /// If repeated, only the final validator will apply.
    pub fn validator(
        mut self,
        validator: impl Fn(&TypedValue<'_>) -> Result<(), ValidationError> + 'static,
    ) -> Self {
        self.0.validator.replace(Box::new(validator));
        self
    }

    pub(crate) fn consume(self) -> FieldDescriptor {
        self.0
    }
}

/// A positional parameter, bound by its fixed index into the tokens following the sub-command name.
///
/// Positions are always resolved against the tokens as given; they need not be contiguous or declared in order.
///
/// ### Example
/// ```
/// use modcli::{Positional, ValidationError};
///
/// let instance_type = Positional::string("instance_type", 0)
///     .help("The instance type to target.")
///     .validator(|value| match value.as_string() {
///         Some(instance) if instance.contains("s3") => Ok(()),
///         _ => Err(ValidationError::new("invalid instance type, must be 's3'")),
///     });
/// ```
pub struct Positional(FieldDescriptor);

impl Positional {
    /// Create a positional parameter of the given type.
    pub fn new(name: impl Into<String>, arg_type: ArgType, position: usize) -> Self {
        Positional(FieldDescriptor::new(name.into(), arg_type, Some(position)))
    }

    /// Create a string positional parameter.
    pub fn string(name: impl Into<String>, position: usize) -> Self {
        Self::new(name, ArgType::String, position)
    }

    /// Create a bool positional parameter.
    pub fn bool(name: impl Into<String>, position: usize) -> Self {
        Self::new(name, ArgType::Bool, position)
    }

    /// Create an int positional parameter.
    pub fn int(name: impl Into<String>, position: usize) -> Self {
        Self::new(name, ArgType::Int, position)
    }

    /// Document the help message for this positional parameter.
    /// If repeated, only the final help message will apply.
    pub fn help(mut self, description: impl Into<String>) -> Self {
        self.0.help.replace(description.into());
        self
    }

    /// Check the bound value once extraction is complete.
    /// If repeated, only the final validator will apply.
    pub fn validator(
        mut self,
        validator: impl Fn(&TypedValue<'_>) -> Result<(), ValidationError> + 'static,
    ) -> Self {
        self.0.validator.replace(Box::new(validator));
        self
    }

    pub(crate) fn consume(self) -> FieldDescriptor {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn flag() {
        let descriptor = Flag::int("count")
            .default(3)
            .default(4)
            .help("--this will get discarded--")
            .help("How many files to count.")
            .consume();

        assert_eq!(descriptor.name(), "count");
        assert_eq!(descriptor.arg_type(), ArgType::Int);
        assert_eq!(descriptor.default_value(), Some(&Value::Int(4)));
        assert!(!descriptor.is_required());
        assert_eq!(descriptor.help(), Some("How many files to count."));
        assert_eq!(descriptor.position(), None);
        assert!(!descriptor.has_validator());
    }

    #[test]
    fn flag_required() {
        let descriptor = Flag::string("file").required().consume();
        assert!(descriptor.is_required());
        assert_eq!(descriptor.default_value(), None);
    }

    #[rstest]
    #[case(Flag::string("abc"), ArgType::String)]
    #[case(Flag::bool("abc"), ArgType::Bool)]
    #[case(Flag::int("abc"), ArgType::Int)]
    #[case(Flag::new("abc", ArgType::Invalid), ArgType::Invalid)]
    fn flag_types(#[case] flag: Flag, #[case] expected: ArgType) {
        assert_eq!(flag.consume().arg_type(), expected);
    }

    #[rstest]
    #[case(Positional::string("abc", 0), ArgType::String, 0)]
    #[case(Positional::bool("abc", 3), ArgType::Bool, 3)]
    #[case(Positional::int("abc", 1), ArgType::Int, 1)]
    #[case(Positional::new("abc", ArgType::Invalid, 2), ArgType::Invalid, 2)]
    fn positional_builder(
        #[case] positional: Positional,
        #[case] arg_type: ArgType,
        #[case] position: usize,
    ) {
        let descriptor = positional.consume();
        assert_eq!(descriptor.name(), "abc");
        assert_eq!(descriptor.arg_type(), arg_type);
        assert_eq!(descriptor.position(), Some(position));
        assert!(descriptor.is_required());
        assert_eq!(descriptor.default_value(), None);
    }

    #[test]
    fn validate() {
        let descriptor = Flag::string("file")
            .validator(|value| match value.as_string() {
                Some(file) if file.ends_with(".ext") => Ok(()),
                _ => Err(ValidationError::new("filetype must be .ext")),
            })
            .consume();
        assert!(descriptor.has_validator());

        let good = Value::from("data.ext");
        descriptor
            .validate(&TypedValue::bind(&descriptor, &good))
            .unwrap();

        let bad = Value::from("data.txt");
        let error = descriptor
            .validate(&TypedValue::bind(&descriptor, &bad))
            .unwrap_err();
        assert_eq!(error, ValidationError::new("filetype must be .ext"));
        assert_eq!(error.message(), "filetype must be .ext");
    }

    #[test]
    fn validate_absent() {
        let descriptor = Positional::int("count", 0).consume();
        let value = Value::Int(1);
        descriptor
            .validate(&TypedValue::bind(&descriptor, &value))
            .unwrap();
    }

    #[test]
    fn debug() {
        let descriptor = Flag::string("file")
            .default("a.ext")
            .required()
            .help("The file.")
            .validator(|_| Ok(()))
            .consume();
        assert_eq!(
            format!("{descriptor:?}"),
            "Flag[string, --file, default=a.ext, required, validated, The file.]"
        );

        let descriptor = Positional::int("count", 2).consume();
        assert_eq!(format!("{descriptor:?}"), "Positional[int, count@2]");
    }
}
