use std::collections::VecDeque;
use thiserror::Error;

use crate::api::InvalidConversion;
use crate::registry::{Builtin, DeclarationError, Descriptor, OptionRegistry};
use crate::tokens::{tokenize, Token};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// An error encountered while parsing the command line.
/// Reported by [`GeneralParser::parse_tokens`](./struct.GeneralParser.html#method.parse_tokens).
///
/// Where the error is tied to a token, its `offset` is the character offset of that token within the
/// concatenated input (excluding the program name).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A token could not convert to the option's type.
    #[error("Option '{name}' cannot convert '{token}' to {type_name}.")]
    Conversion {
        /// The option, as it appeared on the Cli (or its name, when positional).
        name: String,
        /// The offending token.
        token: String,
        /// The name of the target type.
        type_name: &'static str,
        /// The offset of the offending token.
        offset: usize,
    },

    /// A valued option was not followed by its value.
    #[error("Expected argument after '{name}', but none given.")]
    MissingArgument {
        /// The option, as it appeared on the Cli.
        name: String,
        /// The offset of the option.
        offset: usize,
    },

    /// A value fell outside of the option's choices.
    #[error("Option '{name}' does not accept '{token}': expected one of {{{}}}.", .choices.join(", "))]
    InvalidChoice {
        /// The option, as it appeared on the Cli.
        name: String,
        /// The offending token.
        token: String,
        /// The accepted values.
        choices: Vec<String>,
        /// The offset of the offending token.
        offset: usize,
    },

    /// A required option was not set by the Cli or a default.
    #[error("Option '{name}' is required.")]
    MissingRequired {
        /// The option's name.
        name: String,
    },

    /// A non-option token appeared after every positional option had been filled.
    #[error("Unexpected token '{token}'.")]
    UnexpectedToken {
        /// The offending token.
        token: String,
        /// The offset of the offending token.
        offset: usize,
    },
}

impl ParseError {
    /// The offset of the token responsible for this error, if any.
    pub fn offset(&self) -> Option<usize> {
        match self {
            ParseError::Conversion { offset, .. }
            | ParseError::MissingArgument { offset, .. }
            | ParseError::InvalidChoice { offset, .. }
            | ParseError::UnexpectedToken { offset, .. } => Some(*offset),
            ParseError::MissingRequired { .. } => None,
        }
    }
}

/// Behaviour to capture an explicit generic type T from an input `&str`.
///
/// We use this at the top of the command line parser object graph so the compiler can maintain a list of many different types.
pub(crate) trait AnonymousCapturable {
    /// Convert the token and apply it as the current value.
    fn capture(&mut self, token: &str) -> Result<(), InvalidConversion>;

    /// Apply the default as the current value, returning whether there was one to apply.
    fn restore_default(&mut self) -> bool;

    /// Invoke the callback, if any, with the current value.
    fn dispatch(&mut self);
}

pub(crate) type Capture<'a> = (Descriptor, Box<dyn AnonymousCapturable + 'a>);

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Action {
    Complete,
    Overruled {
        name: String,
        builtin: Option<Builtin>,
    },
}

pub(crate) struct Parser<'a> {
    registry: OptionRegistry,
    captures: Vec<Box<dyn AnonymousCapturable + 'a>>,
}

impl<'a> Parser<'a> {
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self::new(Vec::default()).unwrap()
    }

    pub(crate) fn new(captures: Vec<Capture<'a>>) -> Result<Self, DeclarationError> {
        let (descriptors, captures): (Vec<Descriptor>, Vec<Box<dyn AnonymousCapturable + 'a>>) =
            captures.into_iter().unzip();
        let registry = OptionRegistry::new(descriptors)?;

        Ok(Self { registry, captures })
    }

    /// Run the parse against the `tokens` (excluding the program name).
    ///
    /// The scan matches and captures every token, in order.
    /// A `KEY=VALUE` token is split at the head of the scan only, so the value taken by an option stays whole.
    /// Only then are the overruling options, defaults, requirements, and callbacks resolved.
    pub(crate) fn consume(mut self, tokens: &[&str]) -> Result<Action, ParseError> {
        let mut tokens = tokenize(tokens);
        let mut positionals: VecDeque<usize> =
            self.registry.positionals().iter().copied().collect();
        let mut invocations: Vec<usize> = Vec::default();

        while let Some(raw) = tokens.pop_front() {
            let token = match raw.split_key(|key| self.registry.is_key(key)) {
                Some((key, value)) => {
                    tokens.push_front(value);
                    key
                }
                None => raw,
            };

            match self.registry.lookup(&token.value) {
                Some(index) => {
                    let argument = if self.registry.descriptor(index).is_flag() {
                        Token {
                            value: String::default(),
                            offset: token.offset,
                        }
                    } else {
                        match tokens.pop_front() {
                            Some(argument) if !self.registry.is_key(&argument.value) => {
                                let descriptor = self.registry.descriptor(index);

                                if !descriptor.accepts(&argument.value) {
                                    return Err(ParseError::InvalidChoice {
                                        name: token.value,
                                        token: argument.value,
                                        choices: descriptor.choices().to_vec(),
                                        offset: argument.offset,
                                    });
                                }

                                argument
                            }
                            _ => {
                                return Err(ParseError::MissingArgument {
                                    name: token.value,
                                    offset: token.offset,
                                });
                            }
                        }
                    };

                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Matched '{}' with value '{}'.", token.value, argument.value);
                    }

                    self.capture(index, &token.value, argument)?;
                    invocations.push(index);
                }
                None => match positionals.pop_front() {
                    Some(index) => {
                        let name = self.registry.descriptor(index).name().to_string();

                        #[cfg(feature = "tracing_debug")]
                        {
                            debug!("Assigned '{}' to positional '{name}'.", token.value);
                        }

                        self.capture(index, &name, token)?;
                        invocations.push(index);
                    }
                    None => {
                        return Err(ParseError::UnexpectedToken {
                            token: token.value,
                            offset: token.offset,
                        });
                    }
                },
            }
        }

        if let Some(index) = self.registry.overruled() {
            let descriptor = self.registry.descriptor(index);

            #[cfg(feature = "tracing_debug")]
            {
                debug!("Overruled by '{}'.", descriptor.name());
            }

            let action = Action::Overruled {
                name: descriptor.name().to_string(),
                builtin: descriptor.builtin(),
            };
            self.captures[index].dispatch();
            return Ok(action);
        }

        for index in 0..self.captures.len() {
            if !self.registry.descriptor(index).was_set() && self.captures[index].restore_default()
            {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!(
                        "Applied the default to '{}'.",
                        self.registry.descriptor(index).name()
                    );
                }

                self.registry.mark(index);
            }
        }

        if let Some(descriptor) = self.registry.missing_required() {
            return Err(ParseError::MissingRequired {
                name: descriptor.name().to_string(),
            });
        }

        for index in invocations {
            self.captures[index].dispatch();
        }

        Ok(Action::Complete)
    }

    fn capture(&mut self, index: usize, name: &str, token: Token) -> Result<(), ParseError> {
        self.captures[index]
            .capture(&token.value)
            .map_err(|error| ParseError::Conversion {
                name: name.to_string(),
                token: error.token,
                type_name: error.type_name,
                offset: token.offset,
            })?;
        self.registry.mark(index);
        Ok(())
    }
}
