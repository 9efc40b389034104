use std::collections::HashMap;
use thiserror::Error;

use crate::api::{FieldDescriptor, TypedValue};
use crate::constant::*;
use crate::model::{ArgType, InvalidConversion, Value};
use crate::parser::ConfigError;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// An error while parsing the flags of a sub-command.
///
/// These are routed through the sub-command's [`ErrorHandling`](crate::ErrorHandling) policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlagError {
    /// A `--NAME` which is not declared on the sub-command.
    #[error("flag provided but not defined: '--{0}'.")]
    UnknownFlag(String),
    /// A non-bool flag at the end of the input, without a value.
    #[error("flag needs an argument: '--{0}'.")]
    MissingValue(String),
    /// A flag value which does not convert to the declared type.
    #[error("invalid value for flag '--{name}': {source}")]
    InvalidValue {
        /// The flag name.
        name: String,
        /// The failed conversion.
        source: InvalidConversion,
    },
    /// A token that looks like a flag, but isn't in `--NAME` form.
    #[error("bad flag syntax: '{0}'.")]
    BadSyntax(String),
    /// `--help` was specified.
    #[error("help requested.")]
    HelpRequested,
}

pub(crate) struct FlagSlot {
    descriptor: FieldDescriptor,
    initial: Value,
    value: Value,
    present: bool,
}

impl FlagSlot {
    pub(crate) fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub(crate) fn typed_value(&self) -> TypedValue<'_> {
        TypedValue::bind(&self.descriptor, &self.value)
    }

    pub(crate) fn is_present(&self) -> bool {
        self.present
    }
}

/// The underlying flag parser of a sub-command.
///
/// Each bound flag owns a slot holding its default until the flag is matched.
#[derive(Default)]
pub(crate) struct FlagSet {
    slots: Vec<FlagSlot>,
    index: HashMap<String, usize>,
}

impl std::fmt::Debug for FlagSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|slot| &slot.descriptor))
            .finish()
    }
}

impl FlagSet {
    /// Register a flag, with its slot initialized to the flag's default.
    pub(crate) fn bind(&mut self, descriptor: FieldDescriptor) -> Result<(), ConfigError> {
        let name = descriptor.name().to_string();

        if descriptor.arg_type() == ArgType::Invalid {
            return Err(ConfigError::InvalidArgumentType(name));
        }

        if name.starts_with('-') || name.contains('=') {
            return Err(ConfigError::InvalidName(name));
        }

        if self.index.contains_key(&name) {
            return Err(ConfigError::DuplicateName(name));
        }

        let initial = match descriptor.default_value() {
            Some(value) if value.arg_type() != descriptor.arg_type() => {
                return Err(ConfigError::DefaultTypeMismatch {
                    name,
                    expected: descriptor.arg_type(),
                    actual: value.arg_type(),
                });
            }
            Some(value) => value.clone(),
            None => Value::zero(descriptor.arg_type())
                .ok_or_else(|| ConfigError::InvalidArgumentType(name.clone()))?,
        };

        self.index.insert(name, self.slots.len());
        self.slots.push(FlagSlot {
            descriptor,
            value: initial.clone(),
            initial,
            present: false,
        });
        Ok(())
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&FlagSlot> {
        self.index.get(name).map(|i| &self.slots[*i])
    }

    pub(crate) fn slots(&self) -> &[FlagSlot] {
        &self.slots
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn reset(&mut self) {
        for slot in self.slots.iter_mut() {
            slot.value = slot.initial.clone();
            slot.present = false;
        }
    }

    /// Parse the flags from the front of `tokens`, returning the tokens following them.
    ///
    /// Parsing stops at the first non-flag token, or just after a bare `--`.
    /// Every slot is reset to its default beforehand, so repeated parses do not accumulate.
    pub(crate) fn parse<'t>(&mut self, tokens: &[&'t str]) -> Result<Vec<&'t str>, FlagError> {
        self.reset();
        let mut offset = 0;

        while let Some(token) = tokens.get(offset) {
            if *token == FLAG_TERMINATOR {
                offset += 1;
                break;
            }

            let Some(body) = token.strip_prefix(FLAG_PREFIX) else {
                if is_short_flag(token) {
                    return Err(FlagError::BadSyntax(token.to_string()));
                }

                break;
            };
            let (name, inline) = match body.split_once('=') {
                Some((name, value)) => (name, Some(value)),
                None => (body, None),
            };

            if name.is_empty() || name.starts_with('-') {
                return Err(FlagError::BadSyntax(token.to_string()));
            }

            let Some(&i) = self.index.get(name) else {
                if name == HELP_NAME {
                    return Err(FlagError::HelpRequested);
                }

                return Err(FlagError::UnknownFlag(name.to_string()));
            };
            let slot = &mut self.slots[i];
            let arg_type = slot.descriptor.arg_type();
            let raw = match (arg_type, inline) {
                (_, Some(raw)) => raw,
                (ArgType::Bool, None) => "true",
                (_, None) => {
                    // The value is taken verbatim, even when it looks like a flag.
                    offset += 1;
                    tokens
                        .get(offset)
                        .copied()
                        .ok_or_else(|| FlagError::MissingValue(name.to_string()))?
                }
            };

            slot.value = Value::parse(arg_type, raw).map_err(|source| FlagError::InvalidValue {
                name: name.to_string(),
                source,
            })?;
            slot.present = true;
            offset += 1;
        }

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Parsed flags from {offset} token(s), leaving {remaining}.",
                remaining = tokens.len() - offset
            );
        }

        Ok(tokens[offset..].to_vec())
    }
}

// "-x" is a flag in the wrong syntax, whereas "-" and "-5" are plain tokens.
fn is_short_flag(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some('-') && chars.next().map_or(false, |c| !c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Flag;
    use rstest::rstest;

    fn flag_set() -> FlagSet {
        let mut flag_set = FlagSet::default();
        flag_set
            .bind(Flag::string("file").default("").consume())
            .unwrap();
        flag_set
            .bind(Flag::bool("recursive").default(false).consume())
            .unwrap();
        flag_set
            .bind(Flag::int("count").default(4).consume())
            .unwrap();
        flag_set
    }

    fn values(flag_set: &FlagSet) -> (String, bool, i64) {
        (
            flag_set
                .get("file")
                .unwrap()
                .typed_value()
                .as_string()
                .unwrap()
                .to_string(),
            flag_set
                .get("recursive")
                .unwrap()
                .typed_value()
                .as_bool()
                .unwrap(),
            flag_set.get("count").unwrap().typed_value().as_int().unwrap(),
        )
    }

    #[test]
    fn parse_empty() {
        let mut flag_set = flag_set();

        let remaining = flag_set.parse(&[]).unwrap();

        assert!(remaining.is_empty());
        assert_eq!(values(&flag_set), ("".to_string(), false, 4));
        assert!(!flag_set.get("file").unwrap().is_present());
    }

    #[rstest]
    #[case(vec!["--file", "a.ext"], ("a.ext", false, 4), vec![])]
    #[case(vec!["--file=a.ext"], ("a.ext", false, 4), vec![])]
    #[case(vec!["--file=a=b"], ("a=b", false, 4), vec![])]
    #[case(vec!["--file="], ("", false, 4), vec![])]
    #[case(vec!["--file", "--count"], ("--count", false, 4), vec![])]
    #[case(vec!["--recursive"], ("", true, 4), vec![])]
    #[case(vec!["--recursive=false"], ("", false, 4), vec![])]
    #[case(vec!["--recursive=1"], ("", true, 4), vec![])]
    #[case(vec!["--recursive", "false"], ("", true, 4), vec!["false"])]
    #[case(vec!["--count", "7"], ("", false, 7), vec![])]
    #[case(vec!["--count=-7"], ("", false, -7), vec![])]
    #[case(vec!["--count", "0x10"], ("", false, 16), vec![])]
    #[case(vec!["--count", "1", "--count", "2"], ("", false, 2), vec![])]
    #[case(vec!["--file", "a.ext", "--recursive", "--count", "7"], ("a.ext", true, 7), vec![])]
    #[case(vec!["--count", "7", "x", "--recursive"], ("", false, 7), vec!["x", "--recursive"])]
    #[case(vec!["--count", "7", "--", "--recursive"], ("", false, 7), vec!["--recursive"])]
    #[case(vec!["--", "x"], ("", false, 4), vec!["x"])]
    #[case(vec!["x", "--count", "7"], ("", false, 4), vec!["x", "--count", "7"])]
    #[case(vec!["-", "--count", "7"], ("", false, 4), vec!["-", "--count", "7"])]
    #[case(vec!["-5"], ("", false, 4), vec!["-5"])]
    fn parse(
        #[case] tokens: Vec<&str>,
        #[case] expected: (&str, bool, i64),
        #[case] expected_remaining: Vec<&str>,
    ) {
        let mut flag_set = flag_set();

        let remaining = flag_set.parse(tokens.as_slice()).unwrap();

        assert_eq!(values(&flag_set), (expected.0.to_string(), expected.1, expected.2));
        assert_eq!(remaining, expected_remaining);
    }

    #[rstest]
    #[case(vec!["--file", "a.ext"], true, false, false)]
    #[case(vec!["--file=a.ext", "--count", "1"], true, false, true)]
    #[case(vec!["--recursive=false"], false, true, false)]
    #[case(vec!["x", "--file", "a.ext"], false, false, false)]
    fn parse_presence(
        #[case] tokens: Vec<&str>,
        #[case] file: bool,
        #[case] recursive: bool,
        #[case] count: bool,
    ) {
        let mut flag_set = flag_set();

        flag_set.parse(tokens.as_slice()).unwrap();

        assert_eq!(flag_set.get("file").unwrap().is_present(), file);
        assert_eq!(flag_set.get("recursive").unwrap().is_present(), recursive);
        assert_eq!(flag_set.get("count").unwrap().is_present(), count);
    }

    #[test]
    fn parse_presence_exact() {
        let mut flag_set = FlagSet::default();
        flag_set.bind(Flag::string("name").consume()).unwrap();
        flag_set.bind(Flag::string("namefoo").consume()).unwrap();

        flag_set.parse(&["--namefoo", "x"]).unwrap();

        assert!(!flag_set.get("name").unwrap().is_present());
        assert!(flag_set.get("namefoo").unwrap().is_present());
    }

    #[rstest]
    #[case(vec!["--abc"], FlagError::UnknownFlag("abc".to_string()))]
    #[case(vec!["--abc=1"], FlagError::UnknownFlag("abc".to_string()))]
    #[case(vec!["--fil", "a.ext"], FlagError::UnknownFlag("fil".to_string()))]
    #[case(vec!["--file"], FlagError::MissingValue("file".to_string()))]
    #[case(vec!["--count"], FlagError::MissingValue("count".to_string()))]
    #[case(vec!["--count", "seven"], FlagError::InvalidValue {
        name: "count".to_string(),
        source: InvalidConversion { token: "seven".to_string(), arg_type: ArgType::Int },
    })]
    #[case(vec!["--recursive=yes"], FlagError::InvalidValue {
        name: "recursive".to_string(),
        source: InvalidConversion { token: "yes".to_string(), arg_type: ArgType::Bool },
    })]
    #[case(vec!["-f", "a.ext"], FlagError::BadSyntax("-f".to_string()))]
    #[case(vec!["---file", "a.ext"], FlagError::BadSyntax("---file".to_string()))]
    #[case(vec!["--=a.ext"], FlagError::BadSyntax("--=a.ext".to_string()))]
    #[case(vec!["--help"], FlagError::HelpRequested)]
    #[case(vec!["--count", "1", "--help"], FlagError::HelpRequested)]
    fn parse_invalid(#[case] tokens: Vec<&str>, #[case] expected: FlagError) {
        let mut flag_set = flag_set();

        let error = flag_set.parse(tokens.as_slice()).unwrap_err();

        assert_eq!(error, expected);
    }

    #[test]
    fn parse_declared_help() {
        let mut flag_set = FlagSet::default();
        flag_set.bind(Flag::bool("help").consume()).unwrap();

        flag_set.parse(&["--help"]).unwrap();

        assert_eq!(
            flag_set.get("help").unwrap().typed_value().as_bool(),
            Some(true)
        );
    }

    #[test]
    fn parse_resets() {
        let mut flag_set = flag_set();
        flag_set
            .parse(&["--file", "a.ext", "--recursive", "--count", "7"])
            .unwrap();
        assert_eq!(values(&flag_set), ("a.ext".to_string(), true, 7));

        flag_set.parse(&["--count", "8"]).unwrap();

        assert_eq!(values(&flag_set), ("".to_string(), false, 8));
        assert!(!flag_set.get("file").unwrap().is_present());
        assert!(flag_set.get("count").unwrap().is_present());
    }

    #[test]
    fn bind_zero_defaults() {
        let mut flag_set = FlagSet::default();
        flag_set.bind(Flag::string("s").consume()).unwrap();
        flag_set.bind(Flag::bool("b").consume()).unwrap();
        flag_set.bind(Flag::int("i").consume()).unwrap();

        assert_eq!(flag_set.len(), 3);
        assert_eq!(flag_set.get("s").unwrap().typed_value().as_string(), Some(""));
        assert_eq!(flag_set.get("b").unwrap().typed_value().as_bool(), Some(false));
        assert_eq!(flag_set.get("i").unwrap().typed_value().as_int(), Some(0));
        assert!(flag_set.get("x").is_none());
    }

    #[test]
    fn bind_invalid_type() {
        let mut flag_set = FlagSet::default();

        let error = flag_set
            .bind(Flag::new("abc", ArgType::Invalid).default(1).consume())
            .unwrap_err();

        assert_eq!(error, ConfigError::InvalidArgumentType("abc".to_string()));
        assert_eq!(flag_set.len(), 0);
        assert!(!flag_set.contains("abc"));
    }

    #[rstest]
    #[case(Flag::string("abc").default(1), ArgType::String, ArgType::Int)]
    #[case(Flag::bool("abc").default("true"), ArgType::Bool, ArgType::String)]
    #[case(Flag::int("abc").default(false), ArgType::Int, ArgType::Bool)]
    fn bind_default_mismatch(
        #[case] flag: Flag,
        #[case] expected: ArgType,
        #[case] actual: ArgType,
    ) {
        let mut flag_set = FlagSet::default();

        let error = flag_set.bind(flag.consume()).unwrap_err();

        assert_matches!(error, ConfigError::DefaultTypeMismatch { name, expected: e, actual: a } => {
            assert_eq!(name, "abc");
            assert_eq!(e, expected);
            assert_eq!(a, actual);
        });
        assert_eq!(flag_set.len(), 0);
    }

    #[rstest]
    #[case("-v")]
    #[case("--file")]
    #[case("a=b")]
    #[case("file=")]
    fn bind_invalid_name(#[case] name: &str) {
        let mut flag_set = FlagSet::default();

        let error = flag_set.bind(Flag::string(name).consume()).unwrap_err();

        assert_eq!(error, ConfigError::InvalidName(name.to_string()));
        assert_eq!(flag_set.len(), 0);
    }

    #[test]
    fn bind_name_with_inner_dash() {
        let mut flag_set = FlagSet::default();
        flag_set.bind(Flag::bool("dry-run").consume()).unwrap();

        flag_set.parse(&["--dry-run"]).unwrap();

        assert!(flag_set.get("dry-run").unwrap().is_present());
    }

    #[test]
    fn bind_duplicate() {
        let mut flag_set = FlagSet::default();
        flag_set.bind(Flag::string("abc").consume()).unwrap();

        let error = flag_set.bind(Flag::int("abc").consume()).unwrap_err();

        assert_eq!(error, ConfigError::DuplicateName("abc".to_string()));
        assert_eq!(flag_set.len(), 1);
    }

    #[rstest]
    #[case("-x", true)]
    #[case("-file", true)]
    #[case("-", false)]
    #[case("-5", false)]
    #[case("x", false)]
    #[case("", false)]
    fn short_flag(#[case] token: &str, #[case] expected: bool) {
        assert_eq!(is_short_flag(token), expected);
    }
}
