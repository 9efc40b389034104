use crate::api::{FieldDescriptor, TypedValue};
use crate::constant::*;
use crate::model::ErrorHandling;
use crate::parser::{
    validate_flags, validate_positionals, ConfigError, FlagError, FlagSet, ParseError,
    Positionals, Printer, UserInterface,
};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// A registered sub-command: its declared fields and the values bound by the latest parse.
///
/// Obtained from [`CommandLineInterface::parse_tokens`](crate::CommandLineInterface::parse_tokens) or [`CommandLineInterface::command`](crate::CommandLineInterface::command).
pub struct Command {
    name: String,
    about: Option<String>,
    error_handling: ErrorHandling,
    flags: FlagSet,
    positionals: Positionals,
    remaining: Vec<String>,
    printer: Printer,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("error_handling", &self.error_handling)
            .field("flags", &self.flags)
            .field("positionals", &self.positionals)
            .finish()
    }
}

impl Command {
    pub(crate) fn new(
        name: String,
        about: Option<String>,
        error_handling: ErrorHandling,
        printer: Printer,
    ) -> Self {
        Self {
            name,
            about,
            error_handling,
            flags: FlagSet::default(),
            positionals: Positionals::default(),
            remaining: Vec::default(),
            printer,
        }
    }

    pub(crate) fn bind_flag(&mut self, descriptor: FieldDescriptor) -> Result<(), ConfigError> {
        self.check_name(&descriptor)?;
        self.flags.bind(descriptor)
    }

    pub(crate) fn bind_positional(
        &mut self,
        descriptor: FieldDescriptor,
    ) -> Result<(), ConfigError> {
        self.check_name(&descriptor)?;
        self.positionals.register(descriptor)
    }

    // Flags and positionals share one namespace.
    fn check_name(&self, descriptor: &FieldDescriptor) -> Result<(), ConfigError> {
        let name = descriptor.name();

        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }

        if self.flags.contains(name) || self.positionals.contains(name) {
            return Err(ConfigError::DuplicateName(name.to_string()));
        }

        Ok(())
    }

    /// Bind `tokens` (everything after the sub-command name) and validate the result.
    pub(crate) fn invoke(
        &mut self,
        program: &str,
        tokens: &[&str],
        user_interface: &dyn UserInterface,
    ) -> Result<(), ParseError> {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Invoking sub-command '{}' with {tokens:?}.", self.name);
        }

        self.flags.reset();
        self.remaining.clear();

        let leftover = self.positionals.extract(tokens)?;
        validate_positionals(&self.positionals)?;

        let remaining = match self.flags.parse(leftover.as_slice()) {
            Ok(remaining) => remaining,
            Err(error) => return Err(self.fail(program, error, user_interface)),
        };
        self.remaining = remaining.iter().map(|token| token.to_string()).collect();

        validate_flags(&self.flags)
    }

    fn fail(
        &self,
        program: &str,
        error: FlagError,
        user_interface: &dyn UserInterface,
    ) -> ParseError {
        let label = self.label(program);

        // Help goes to stdout; an error and its usage both go to stderr.
        if error == FlagError::HelpRequested {
            self.printer.print_help(
                &label,
                self.about.as_deref(),
                &self.positionals,
                &self.flags,
                user_interface,
            );
        } else {
            user_interface.print_error(&error);
            self.printer.print_error_context(
                &label,
                self.about.as_deref(),
                &self.positionals,
                &self.flags,
                user_interface,
            );
        }

        match self.error_handling {
            ErrorHandling::ContinueOnError => ParseError::Flag(error),
            ErrorHandling::ExitOnError => {
                let exit_code = if error == FlagError::HelpRequested {
                    HELP_EXIT_CODE
                } else {
                    ERROR_EXIT_CODE
                };
                std::process::exit(exit_code);
            }
            ErrorHandling::PanicOnError => panic!("{error}"),
        }
    }

    fn label(&self, program: &str) -> String {
        format!("{program} {name}", name = self.name)
    }

    /// The name this sub-command is registered under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The about message of this sub-command, if any.
    pub fn about(&self) -> Option<&str> {
        self.about.as_deref()
    }

    /// The policy applied when the flags fail to parse.
    pub fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    /// The value of the flag `name`: what was parsed, or else its default.
    /// `None` when no such flag is declared.
    ///
    /// ### Example
    /// ```
    /// use modcli::{CommandLineInterface, Flag, SubCommand};
    ///
    /// let mut cli = CommandLineInterface::new();
    /// cli.register("run", SubCommand::default().flag(Flag::bool("verbose")))
    ///     .unwrap();
    ///
    /// let command = cli.parse_tokens(&["prog", "run"]).unwrap();
    /// assert_eq!(command.flag("verbose").unwrap().as_bool(), Some(false));
    /// assert!(command.flag("quiet").is_none());
    /// ```
    pub fn flag(&self, name: &str) -> Option<TypedValue<'_>> {
        self.flags.get(name).map(|slot| slot.typed_value())
    }

    /// The value of the positional parameter `name`.
    /// `None` when no such positional is declared, or before it has been bound by a successful extraction.
    pub fn positional(&self, name: &str) -> Option<TypedValue<'_>> {
        self.positionals
            .get(name)
            .and_then(|slot| slot.typed_value())
    }

    /// The flag values, in declaration order.
    pub fn flags(&self) -> impl Iterator<Item = TypedValue<'_>> {
        self.flags.slots().iter().map(|slot| slot.typed_value())
    }

    /// The bound positional values, in declaration order.
    pub fn positionals(&self) -> impl Iterator<Item = TypedValue<'_>> {
        self.positionals
            .slots()
            .iter()
            .filter_map(|slot| slot.typed_value())
    }

    /// Whether the flag `name` was specified on the command line.
    /// A positional parameter is present once it has been bound.
    ///
    /// The match is exact: `--namefoo` does not make `name` present.
    pub fn is_present(&self, name: &str) -> bool {
        match self.flags.get(name) {
            Some(slot) => slot.is_present(),
            None => self.positional(name).is_some(),
        }
    }

    /// The tokens left over after flag parsing stopped (at the first non-flag token, or after `--`).
    pub fn remaining(&self) -> &[String] {
        &self.remaining
    }

    /// Render the usage message of this sub-command.
    pub fn usage(&self, program: &str) -> String {
        self.printer
            .render(
                &self.label(program),
                self.about.as_deref(),
                &self.positionals,
                &self.flags,
            )
            .join("\n")
    }

    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// Parse the tokens following the sub-command name, without a [`CommandLineInterface`](crate::CommandLineInterface).
    /// See [`SubCommand::build_command`](crate::SubCommand::build_command) for an example.
    #[cfg(feature = "unit_test")]
    pub fn parse_tokens(&mut self, tokens: &[&str]) -> Result<(), ParseError> {
        let user_interface = crate::parser::ConsoleInterface::default();
        self.invoke("test-dummy", tokens, &user_interface)
    }
}
