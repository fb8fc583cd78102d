use crate::api::{Convert, Detached, Parameter};
use crate::constant::*;
use crate::parser::{
    Capture, ConsoleInterface, GeneralParser, ParameterDoc, Parser, Printer, UserInterface,
};
use crate::registry::{Builtin, DeclarationError};

/// The command line parser.
///
/// ### Example
/// ```
/// # use clarg_builder as clarg;
/// use clarg::{CommandLineParser, Outcome};
///
/// let parser = CommandLineParser::new("program")
///     // Configure with CommandLineParser::add.
///     .build();
/// assert_eq!(parser.parse_tokens(&["program"]), Ok(Outcome::Empty));
/// ```
pub struct CommandLineParser<'a> {
    program: String,
    version: Option<String>,
    about: Option<String>,
    parameters: Vec<ParameterDoc>,
    captures: Vec<Capture<'a>>,
    deferred_error: Option<DeclarationError>,
}

impl<'a> CommandLineParser<'a> {
    /// Create a command line parser.
    ///
    /// ### Example
    /// ```
    /// # use clarg_builder as clarg;
    /// use clarg::CommandLineParser;
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .build();
    ///
    /// parser.parse_tokens(&[]).unwrap();
    /// ```
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            version: None,
            about: None,
            parameters: Vec::default(),
            captures: Vec::default(),
            deferred_error: None,
        }
    }

    /// Document the version of the program.
    /// If repeated, only the final version will apply.
    ///
    /// The version is shown in the help message header, and by [`CommandLineParser::add_version`].
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version.replace(version.into());
        self
    }

    /// Document the about message for this command line parser.
    /// If repeated, only the final message will apply.
    ///
    /// An about message documents the command line parser in full sentence/paragraph format.
    /// We recommend allowing `clarg` to format this field (ex: it is not recommended to use line breaks `'\n'`).
    ///
    /// ### Example
    /// ```
    /// # use clarg_builder as clarg;
    /// use clarg::CommandLineParser;
    ///
    /// let parser = CommandLineParser::new("program")
    ///     .about("--this will get discarded--")
    ///     .about("My program that does awesome stuff.  Check it out!")
    ///     .build();
    ///
    /// assert!(parser.help().contains("My program that does awesome stuff."));
    /// ```
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    /// Add a named or positional option to the command line parser.
    ///
    /// The order of positional options corresponds to their positional order during parsing.
    /// The order of all options corresponds to their order in the help message.
    ///
    /// ### Example
    /// ```
    /// # use clarg_builder as clarg;
    /// use clarg::{CommandLineParser, Parameter, Scalar};
    ///
    /// let mut a: u32 = 0;
    /// let mut b: u32 = 0;
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::positional(Scalar::new(&mut a), "A"))
    ///     .add(Parameter::positional(Scalar::new(&mut b), "B"))
    ///     .build();
    ///
    /// parser.parse_tokens(&["program", "1", "2"]).unwrap();
    ///
    /// assert_eq!(a, 1);
    /// assert_eq!(b, 2);
    /// ```
    pub fn add<T: Convert + 'a>(mut self, parameter: Parameter<'a, T>) -> Self {
        let inner = parameter.consume();

        if let Err(error) = inner.check() {
            self.deferred_error = self.deferred_error.take().or(Some(error));
        }

        self.parameters.push(ParameterDoc::from(&inner));
        self.captures.push(Capture::from(inner));
        self
    }

    /// Add the help option `-h`/`--help`.
    ///
    /// The help option is overruling: when it appears on the Cli, the parser prints the help message
    /// and reports [`Outcome::Overruled`](./enum.Outcome.html#variant.Overruled), regardless of the other options.
    ///
    /// ### Example
    /// ```
    /// # use clarg_builder as clarg;
    /// use clarg::{CommandLineParser, Outcome, Parameter, Scalar};
    ///
    /// let mut value: u32 = 0;
    /// let parser = CommandLineParser::new("program")
    ///     .add_help()
    ///     .add(Parameter::option(Scalar::new(&mut value), ["--value"]).required())
    ///     .build();
    ///
    /// assert_eq!(
    ///     parser.parse_tokens(&["program", "--help"]),
    ///     Ok(Outcome::Overruled("-h, --help".to_string()))
    /// );
    /// ```
    pub fn add_help(self) -> Self {
        self.add(
            Parameter::option(Detached::<bool>::default(), HELP_KEYS)
                .flag()
                .overruling()
                .help(HELP_MESSAGE)
                .builtin(Builtin::Help),
        )
    }

    /// Add the version option `-V`/`--version`.
    ///
    /// The version option is overruling: when it appears on the Cli, the parser prints `<program> <version>`
    /// and reports [`Outcome::Overruled`](./enum.Outcome.html#variant.Overruled), regardless of the other options.
    pub fn add_version(self) -> Self {
        self.add(
            Parameter::option(Detached::<bool>::default(), VERSION_KEYS)
                .flag()
                .overruling()
                .help(VERSION_MESSAGE)
                .builtin(Builtin::Version),
        )
    }

    fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<GeneralParser<'a>, DeclarationError> {
        if let Some(error) = self.deferred_error {
            return Err(error);
        }

        let parser = Parser::new(self.captures)?;
        let printer = Printer::terminal(self.program, self.version, self.about, self.parameters);
        Ok(GeneralParser::new(parser, printer, user_interface))
    }

    /// Build the command line parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: a repeated key).
    pub fn build_parser(self) -> Result<GeneralParser<'a>, DeclarationError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the command line parser.
    /// This finalizes the configuration and checks for errors (ex: a repeated key).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> GeneralParser<'a> {
        match self.build_parser() {
            Ok(gp) => gp,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}
