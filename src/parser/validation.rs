use crate::parser::{FlagSet, ParseError, Positionals};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Run the validators of the positionals, in declaration order.
/// Presence was already enforced during extraction.
pub(crate) fn validate_positionals(positionals: &Positionals) -> Result<(), ParseError> {
    for slot in positionals.slots() {
        let descriptor = slot.descriptor();
        let value = slot
            .typed_value()
            .ok_or_else(|| ParseError::RequiredArgumentMissing(descriptor.name().to_string()))?;

        descriptor.validate(&value).map_err(|error| {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Positional '{}' failed validation: {error}", descriptor.name());
            }

            ParseError::Validation(error)
        })?;
    }

    Ok(())
}

/// Check the required flags are present and run their validators, in declaration order.
/// The first failure wins.
pub(crate) fn validate_flags(flags: &FlagSet) -> Result<(), ParseError> {
    for slot in flags.slots() {
        let descriptor = slot.descriptor();

        if descriptor.is_required() && !slot.is_present() {
            return Err(ParseError::RequiredArgumentMissing(
                descriptor.name().to_string(),
            ));
        }

        descriptor.validate(&slot.typed_value()).map_err(|error| {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Flag '{}' failed validation: {error}", descriptor.name());
            }

            ParseError::Validation(error)
        })?;
    }

    Ok(())
}
