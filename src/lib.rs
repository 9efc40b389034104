//! `modcli` is a declarative builder for sub-command style command line interfaces.
//!
//! Describe each sub-command as a set of typed flags (`--name value`) and positional parameters, then let `modcli` bind them from the command line.
//! `modcli` attempts to prioritize the following design concerns:
//! * *Typed values*:
//! Every field declares one of a closed set of types ([`ArgType`]); its bound value is read back through a uniform accessor contract ([`TypedValue`]).
//! * *Fail at declaration, not at use*:
//! Invalid types, mismatched defaults, duplicate names and contested positions are all rejected when a sub-command is registered.
//! * *Domain validation*:
//! Fields may carry a validator, which runs once binding is complete.
//! The first failure is reported verbatim.
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/import.rs")]
//! ```
//!
//! This generates the following Cli program:
//! ```console
//! $ import test --help
//! usage: import test INSTANCE_TYPE [--help] --file FILE [--recursive] [--count COUNT]
//!
//! Import files into an instance.
//!
//! positional arguments:
//!  INSTANCE_TYPE  The instance type to import into. [position 0]
//!
//! options:
//!  --help         Show this help message and exit.
//!  --file FILE    File to import (*.ext) [required]
//!  --recursive    Import the files recursively.
//!  --count COUNT  How many files to import. [default: 4]
//!
//! $ import test s3-nova --file data.ext --recursive --count 7
//! instance_type: s3-nova
//! file: data.ext
//! recursive: true
//! count: 7
//!
//! $ import test s3-nova --file data.txt
//! filetype must be .ext
//! ```
//!
//! # Parsing
//! The first token after the program names the sub-command.
//! The tokens following it are bound in three steps:
//! 1. Each [`Positional`] takes the token at its declared position.
//! Positions always index into the tokens as given, so they need not be contiguous nor declared in order.
//! The claimed tokens are then removed.
//! 2. The [`Flag`]s are parsed from what remains, up to the first non-flag token or `--`.
//! Flags take the forms `--name value`, `--name=value`, and `--name` (for bool flags).
//! 3. Required flags must have been specified (a default does not count), and every validator is run.
//! Positionals are checked before flags, each in declaration order.
//!
//! Flag errors (an unknown flag, a malformed value, `--help`) are routed through the sub-command's [`ErrorHandling`] policy.
//! All other errors are returned as a [`ParseError`].
//!
//! # Features
//! * `unit_test`: For features that help with unit testing.
//! * `tracing_debug`: Emit debug logging via [`tracing`](https://docs.rs/tracing).
#![deny(missing_docs)]
mod api;
mod constant;
mod model;
mod parser;

pub use api::*;
pub use model::*;
pub use parser::{Command, ConfigError, FlagError, ParseError};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
