mod base;
mod flags;
mod interface;
mod middleware;
mod positional;
mod printer;
mod validation;

pub use base::*;
pub use flags::FlagError;
pub(crate) use flags::FlagSet;
pub(crate) use interface::*;
pub use middleware::Command;
pub(crate) use positional::Positionals;
pub(crate) use printer::Printer;
pub(crate) use validation::*;
