pub(crate) const FLAG_PREFIX: &str = "--";
// A bare "--" ends flag parsing.
pub(crate) const FLAG_TERMINATOR: &str = "--";
pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_MESSAGE: &str = "Show this help message and exit.";
pub(crate) const HELP_EXIT_CODE: i32 = 0;
pub(crate) const ERROR_EXIT_CODE: i32 = 2;
