use std::collections::HashMap;
use std::env;

use crate::api::{Flag, Positional};
use crate::model::ErrorHandling;
use crate::parser::{Command, ConfigError, ConsoleInterface, ParseError, Printer, UserInterface};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The declaration of a sub-command: its flags, its positional parameters, and its [`ErrorHandling`] policy.
///
/// Nothing is checked until the sub-command is registered via [`CommandLineInterface::register`].
///
/// ### Example
/// ```
/// use modcli::{ErrorHandling, Flag, Positional, SubCommand};
///
/// let sub_command = SubCommand::new(ErrorHandling::ExitOnError)
///     .about("Import files into an instance.")
///     .positional(Positional::string("instance_type", 0))
///     .flag(Flag::string("file").required())
///     .flag(Flag::bool("recursive"));
/// ```
#[derive(Default)]
pub struct SubCommand {
    about: Option<String>,
    error_handling: ErrorHandling,
    flags: Vec<Flag>,
    positionals: Vec<Positional>,
}

impl SubCommand {
    /// Create a sub-command with the given error handling policy.
    pub fn new(error_handling: ErrorHandling) -> Self {
        Self {
            error_handling,
            ..Self::default()
        }
    }

    /// Document the about message for this sub-command.
    /// If repeated, only the final about message will apply.
    ///
    /// An about message documents the sub-command in full sentence/paragraph format.
    /// We recommend allowing `modcli` to format this field (ex: it is not recommended to use line breaks `'\n'`).
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Add a flag to the sub-command.
    ///
    /// Flags are validated in the order they are added.
    pub fn flag(mut self, flag: Flag) -> Self {
        self.flags.push(flag);
        self
    }

    /// Add a positional parameter to the sub-command.
    ///
    /// The order positionals are added in does not affect which token each receives.
    pub fn positional(mut self, positional: Positional) -> Self {
        self.positionals.push(positional);
        self
    }

    pub(crate) fn build(self, name: String, printer: Printer) -> Result<Command, ConfigError> {
        let SubCommand {
            about,
            error_handling,
            flags,
            positionals,
        } = self;
        let mut command = Command::new(name, about, error_handling, printer);

        for positional in positionals {
            command.bind_positional(positional.consume())?;
        }

        for flag in flags {
            command.bind_flag(flag.consume())?;
        }

        Ok(command)
    }

    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// Build a stand-alone [`Command`] for use in testing.
    ///
    /// ### Example
    /// ```
    /// use modcli::{Flag, SubCommand};
    ///
    /// // Function under test.
    /// // We want to make sure the setup_fn declares the flags correctly.
    /// pub fn setup_fn(sub: SubCommand) -> SubCommand {
    ///     sub.flag(Flag::int("count").default(4))
    /// }
    ///
    /// let mut command = setup_fn(SubCommand::default()).build_command().unwrap();
    /// command.parse_tokens(&["--count", "2"]).unwrap();
    /// assert_eq!(command.flag("count").unwrap().as_int(), Some(2));
    /// ```
    #[cfg(feature = "unit_test")]
    pub fn build_command(self) -> Result<Command, ConfigError> {
        self.build("test-dummy".to_string(), Printer::terminal())
    }
}

/// The registry of sub-commands, dispatching on the sub-command name.
///
/// ### Example
/// ```
/// use modcli::{CommandLineInterface, ErrorHandling, Flag, Positional, SubCommand};
///
/// let mut cli = CommandLineInterface::new();
/// cli.register(
///     "test",
///     SubCommand::new(ErrorHandling::ContinueOnError)
///         .positional(Positional::string("instance_type", 0))
///         .flag(Flag::int("count").default(4)),
/// )
/// .unwrap();
///
/// let command = cli.parse_tokens(&["prog", "test", "s3-nova", "--count", "7"]).unwrap();
/// assert_eq!(command.positional("instance_type").unwrap().as_string(), Some("s3-nova"));
/// assert_eq!(command.flag("count").unwrap().as_int(), Some(7));
/// ```
pub struct CommandLineInterface {
    commands: HashMap<String, Command>,
    user_interface: Box<dyn UserInterface>,
}

impl Default for CommandLineInterface {
    fn default() -> Self {
        Self::with_interface(Box::new(ConsoleInterface::default()))
    }
}

impl std::fmt::Debug for CommandLineInterface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandLineInterface")
            .field("commands", &self.command_names())
            .finish()
    }
}

impl CommandLineInterface {
    /// Create an empty command line interface.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_interface(user_interface: Box<dyn UserInterface>) -> Self {
        Self {
            commands: HashMap::default(),
            user_interface,
        }
    }

    /// Create a command line interface from `(name, sub-command)` pairs.
    /// Fails on the first sub-command which does not register.
    ///
    /// ### Example
    /// ```
    /// use modcli::{CommandLineInterface, SubCommand};
    ///
    /// let cli = CommandLineInterface::create([
    ///     ("import", SubCommand::default()),
    ///     ("export", SubCommand::default()),
    /// ])
    /// .unwrap();
    ///
    /// assert_eq!(cli.command_names(), vec!["export", "import"]);
    /// ```
    pub fn create<N: Into<String>>(
        sub_commands: impl IntoIterator<Item = (N, SubCommand)>,
    ) -> Result<Self, ConfigError> {
        let mut cli = Self::new();

        for (name, sub_command) in sub_commands {
            cli.register(name, sub_command)?;
        }

        Ok(cli)
    }

    /// Register a sub-command under `name`, replacing any sub-command already registered there.
    ///
    /// Every declared field is checked first; on error the registry is left unchanged.
    ///
    /// ### Example
    /// ```
    /// use modcli::{ArgType, CommandLineInterface, ConfigError, Flag, SubCommand};
    ///
    /// let mut cli = CommandLineInterface::new();
    /// let error = cli
    ///     .register("test", SubCommand::default().flag(Flag::new("file", ArgType::Invalid)))
    ///     .unwrap_err();
    ///
    /// assert_eq!(error, ConfigError::InvalidArgumentType("file".to_string()));
    /// assert!(cli.command("test").is_none());
    /// ```
    pub fn register(
        &mut self,
        name: impl Into<String>,
        sub_command: SubCommand,
    ) -> Result<(), ConfigError> {
        let name = name.into();

        if name.is_empty() {
            return Err(ConfigError::EmptyName);
        }

        let command = sub_command.build(name.clone(), Printer::terminal())?;

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Registering sub-command '{name}': {command:?}.");
        }

        self.commands.insert(name, command);
        Ok(())
    }

    /// The sub-command registered under `name`.
    pub fn command(&self, name: &str) -> Option<&Command> {
        self.commands.get(name)
    }

    /// The names of the registered sub-commands, sorted.
    pub fn command_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Run the command line interface against the raw arguments, starting with the program name.
    ///
    /// The sub-command named by `raw_args[1]` binds the tokens which follow it:
    /// 1. The positional parameters take the tokens at their positions.
    /// 2. The positional validators run.
    /// 3. The flags are parsed from the leftover tokens.
    /// 4. The required flags are checked, and the flag validators run.
    ///
    /// The first error encountered is returned.
    /// Flag errors are first routed through the sub-command's [`ErrorHandling`] policy.
    pub fn parse_tokens(&mut self, raw_args: &[&str]) -> Result<&Command, ParseError> {
        let (program, name, tokens) = match raw_args {
            [program, name, tokens @ ..] => (*program, *name, tokens),
            _ => return Err(ParseError::InsufficientArguments),
        };
        let command = self
            .commands
            .get_mut(name)
            .ok_or_else(|| ParseError::UnknownCommand(name.to_string()))?;

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Dispatching to sub-command '{name}'.");
        }

        command.invoke(program, tokens, self.user_interface.as_ref())?;
        Ok(&*command)
    }

    /// Run the command line interface against the Cli [`env::args`].
    /// See [`CommandLineInterface::parse_tokens`].
    pub fn parse(&mut self) -> Result<&Command, ParseError> {
        let raw_args: Vec<String> = env::args().collect();
        self.parse_tokens(
            raw_args
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        )
    }
}
