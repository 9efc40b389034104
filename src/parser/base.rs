use thiserror::Error;

use crate::api::ValidationError;
use crate::model::{ArgType, InvalidConversion};
use crate::parser::FlagError;

/// An error in the declaration of a sub-command, detected at registration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A flag declared with [`ArgType::Invalid`].
    #[error("Config error: invalid argument type for flag '{0}'.")]
    InvalidArgumentType(String),
    /// A positional parameter declared with [`ArgType::Invalid`].
    #[error("Config error: invalid parameter type for positional '{0}'.")]
    InvalidParameterType(String),
    /// A sub-command or field declared with an empty name.
    #[error("Config error: cannot declare an empty name.")]
    EmptyName,
    /// A flag name which no `--NAME` token could ever match.
    #[error("Config error: flag name '{0}' cannot begin with '-' or contain '='.")]
    InvalidName(String),
    /// Two fields of one sub-command share a name.
    #[error("Config error: cannot duplicate the field '{0}'.")]
    DuplicateName(String),
    /// Two positional parameters of one sub-command share a position.
    #[error("Config error: positionals '{first}' and '{second}' both claim position {position}.")]
    DuplicatePosition {
        /// The positional declared first.
        first: String,
        /// The positional declared second.
        second: String,
        /// The contested position.
        position: usize,
    },
    /// A flag whose default does not match its declared type.
    #[error("Config error: flag '{name}' declares a {actual} default for its {expected} type.")]
    DefaultTypeMismatch {
        /// The flag name.
        name: String,
        /// The declared type.
        expected: ArgType,
        /// The type of the declared default.
        actual: ArgType,
    },
}

/// An error in the command line input, detected while parsing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Neither the program nor a sub-command name were provided.
    #[error("Parse error: insufficient arguments (expected '<program> <sub-command> ..').")]
    InsufficientArguments,
    /// The sub-command name is not registered.
    #[error("Parse error: unknown sub-command '{0}'.")]
    UnknownCommand(String),
    /// A positional parameter's position lies beyond the provided tokens.
    #[error("Parse error: position {position} of parameter '{name}' exceeds the {available} provided value(s).")]
    PositionOutOfRange {
        /// The positional name.
        name: String,
        /// The declared position.
        position: usize,
        /// The number of tokens following the sub-command name.
        available: usize,
    },
    /// A positional token which does not convert to the declared type.
    #[error("Parse error: invalid value for parameter '{name}': {source}")]
    InvalidPositional {
        /// The positional name.
        name: String,
        /// The failed conversion.
        source: InvalidConversion,
    },
    /// The flags failed to parse, and the sub-command continues on error.
    #[error("Parse error: {0}")]
    Flag(#[from] FlagError),
    /// A required flag is absent.
    #[error("Parse error: required argument not present: '{0}'.")]
    RequiredArgumentMissing(String),
    /// A validator rejected its bound value.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
