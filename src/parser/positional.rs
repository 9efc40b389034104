use std::collections::HashSet;

use crate::api::{FieldDescriptor, TypedValue};
use crate::model::{ArgType, Value};
use crate::parser::{ConfigError, ParseError};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

pub(crate) struct PositionalSlot {
    descriptor: FieldDescriptor,
    position: usize,
    value: Option<Value>,
}

impl PositionalSlot {
    pub(crate) fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    /// `None` until the slot has been filled by an extraction.
    pub(crate) fn typed_value(&self) -> Option<TypedValue<'_>> {
        self.value
            .as_ref()
            .map(|value| TypedValue::bind(&self.descriptor, value))
    }
}

/// The positional parameters of a sub-command, in declaration order.
#[derive(Default)]
pub(crate) struct Positionals {
    slots: Vec<PositionalSlot>,
}

impl std::fmt::Debug for Positionals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.slots.iter().map(|slot| &slot.descriptor))
            .finish()
    }
}

impl Positionals {
    pub(crate) fn register(&mut self, descriptor: FieldDescriptor) -> Result<(), ConfigError> {
        let name = descriptor.name().to_string();

        if descriptor.arg_type() == ArgType::Invalid {
            return Err(ConfigError::InvalidParameterType(name));
        }

        let position = match descriptor.position() {
            Some(position) => position,
            None => unreachable!("internal error - a positional must declare its position"),
        };

        if self.contains(&name) {
            return Err(ConfigError::DuplicateName(name));
        }

        if let Some(other) = self.slots.iter().find(|slot| slot.position == position) {
            return Err(ConfigError::DuplicatePosition {
                first: other.descriptor.name().to_string(),
                second: name,
                position,
            });
        }

        self.slots.push(PositionalSlot {
            descriptor,
            position,
            value: None,
        });
        Ok(())
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.slots.iter().any(|slot| slot.descriptor.name() == name)
    }

    pub(crate) fn get(&self, name: &str) -> Option<&PositionalSlot> {
        self.slots.iter().find(|slot| slot.descriptor.name() == name)
    }

    pub(crate) fn slots(&self) -> &[PositionalSlot] {
        &self.slots
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.slots.len()
    }

    /// Take each positional's token out of `tokens`, returning what is left for the flags.
    ///
    /// Every position indexes into `tokens` exactly as given.
    /// The claimed tokens are only removed after all of them have been read, so declaration order never affects which token a positional receives.
    /// The unclaimed tokens keep their relative order.
    pub(crate) fn extract<'t>(&mut self, tokens: &[&'t str]) -> Result<Vec<&'t str>, ParseError> {
        for slot in self.slots.iter_mut() {
            slot.value = None;
        }

        if self.slots.is_empty() {
            return Ok(tokens.to_vec());
        }

        let mut values = Vec::with_capacity(self.slots.len());

        for slot in &self.slots {
            let name = slot.descriptor.name();
            let token = tokens
                .get(slot.position)
                .ok_or_else(|| ParseError::PositionOutOfRange {
                    name: name.to_string(),
                    position: slot.position,
                    available: tokens.len(),
                })?;
            let value = Value::parse(slot.descriptor.arg_type(), token).map_err(|source| {
                ParseError::InvalidPositional {
                    name: name.to_string(),
                    source,
                }
            })?;
            values.push(value);
        }

        let claimed: HashSet<usize> = self.slots.iter().map(|slot| slot.position).collect();

        for (slot, value) in self.slots.iter_mut().zip(values) {
            slot.value.replace(value);
        }

        let remaining: Vec<&'t str> = tokens
            .iter()
            .enumerate()
            .filter(|(i, _)| !claimed.contains(i))
            .map(|(_, token)| *token)
            .collect();

        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Extracted {claimed} positional(s), leaving {remaining} token(s).",
                claimed = claimed.len(),
                remaining = remaining.len()
            );
        }

        Ok(remaining)
    }
}
