use std::env;

use crate::model::Outcome;
use crate::parser::base::*;
use crate::parser::interface::UserInterface;
use crate::parser::printer::Printer;
use crate::parser::ErrorContext;
use crate::registry::Builtin;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The configured command line parser.
/// Built via [`CommandLineParser::build`](./struct.CommandLineParser.html#method.build).
///
/// A `GeneralParser` is single use: both of the parse methods consume it.
pub struct GeneralParser<'a> {
    parser: Parser<'a>,
    printer: Printer,
    user_interface: Box<dyn UserInterface>,
}

impl<'a> GeneralParser<'a> {
    pub(crate) fn new(
        parser: Parser<'a>,
        printer: Printer,
        user_interface: Box<dyn UserInterface>,
    ) -> Self {
        Self {
            parser,
            printer,
            user_interface,
        }
    }

    #[cfg(test)]
    pub(crate) fn details(&self) -> (String, Option<String>, Option<String>) {
        self.printer.details()
    }

    /// Render the help message of this command line parser.
    ///
    /// ### Example
    /// ```
    /// # use clarg_builder as clarg;
    /// use clarg::{CommandLineParser, Parameter, Scalar};
    ///
    /// let mut verbose: bool = false;
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option(Scalar::new(&mut verbose), ["-v", "--verbose"]).flag())
    ///     .build();
    ///
    /// assert!(parser.help().contains("usage: program [-v]"));
    /// ```
    pub fn help(&self) -> String {
        self.printer.help()
    }

    /// Run the command line parser against the input tokens, where `tokens[0]` is the program name.
    ///
    /// Parsing happens in two phases:
    /// 1. The scan matches every token to a named or positional option, converting and capturing its value.
    /// This phase mutates your program variables.
    /// 2. The resolution applies defaults, checks required options, and finally invokes the callbacks (in the order the options appeared).
    ///
    /// An overruling option (ex: `--help`) short-circuits phase #2, invoking only its own callback.
    /// The help and version options print their message at this point.
    ///
    /// When there are no tokens beyond the program name, the help message is printed and nothing is parsed.
    ///
    /// ### Example
    /// ```
    /// # use clarg_builder as clarg;
    /// use clarg::{CommandLineParser, Outcome, Parameter, Scalar};
    ///
    /// let mut value: u32 = 0;
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option(Scalar::new(&mut value), ["--value"]).required())
    ///     .build();
    ///
    /// assert_eq!(parser.parse_tokens(&["program", "--value=2"]), Ok(Outcome::Complete));
    /// assert_eq!(value, 2);
    /// ```
    pub fn parse_tokens(self, tokens: &[&str]) -> Result<Outcome, ParseError> {
        let GeneralParser {
            parser,
            printer,
            user_interface,
        } = self;
        run(parser, &printer, &*user_interface, tokens)
    }

    /// Run the command line parser against the Cli [`env::args`].
    ///
    /// Behaves as [`GeneralParser::parse_tokens`], and then:
    /// * Returns when parsing completes.
    /// * Exits with code `0` when an overruling option (ex: `--help`) was given (via [`std::process::exit`]).
    /// * Exits with code `1` when there is nothing to parse, or on a [`ParseError`], after printing the error.
    pub fn parse(self) {
        let tokens: Vec<String> = env::args().collect();

        if let Some(exit_code) =
            self.invoke(tokens.iter().map(AsRef::as_ref).collect::<Vec<&str>>().as_slice())
        {
            std::process::exit(exit_code);
        }
    }

    fn invoke(self, tokens: &[&str]) -> Option<i32> {
        let GeneralParser {
            parser,
            printer,
            user_interface,
        } = self;

        match run(parser, &printer, &*user_interface, tokens) {
            Ok(Outcome::Complete) => None,
            Ok(outcome) => Some(outcome.exit_code()),
            Err(error) => {
                let offset = error.offset();
                user_interface.print_error(error);

                if let Some(offset) = offset {
                    user_interface.print_error_context(ErrorContext::new(
                        offset,
                        tokens.get(1..).unwrap_or_default(),
                    ));
                }

                Some(1)
            }
        }
    }
}

fn run(
    parser: Parser<'_>,
    printer: &Printer,
    user_interface: &(impl UserInterface + ?Sized),
    tokens: &[&str],
) -> Result<Outcome, ParseError> {
    if tokens.len() < 2 {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Nothing to parse, printing help.");
        }

        printer.print_help(user_interface);
        return Ok(Outcome::Empty);
    }

    match parser.consume(&tokens[1..])? {
        Action::Complete => Ok(Outcome::Complete),
        Action::Overruled { name, builtin } => {
            match builtin {
                Some(Builtin::Help) => printer.print_help(user_interface),
                Some(Builtin::Version) => printer.print_version(user_interface),
                None => {
                    // The overruling option's own callback has already run.
                }
            }

            Ok(Outcome::Overruled(name))
        }
    }
}
