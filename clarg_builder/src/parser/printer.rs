use terminal_size::{terminal_size, Width};

use crate::parser::interface::UserInterface;
use crate::parser::ColumnRenderer;

/// The documentation of a single parameter, as used by the help message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParameterDoc {
    keys: Vec<String>,
    name: String,
    argument: Option<String>,
    help: Option<String>,
    flag: bool,
    required: bool,
    choices: Vec<String>,
}

impl ParameterDoc {
    pub(crate) fn named(keys: Vec<String>) -> Self {
        Self {
            keys,
            name: String::default(),
            argument: None,
            help: None,
            flag: false,
            required: false,
            choices: Vec::default(),
        }
    }

    pub(crate) fn positional(name: impl Into<String>) -> Self {
        Self {
            keys: Vec::default(),
            name: name.into(),
            argument: None,
            help: None,
            flag: false,
            required: false,
            choices: Vec::default(),
        }
    }

    pub(crate) fn with_flag(mut self, flag: bool) -> Self {
        self.flag = flag;
        self
    }

    pub(crate) fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub(crate) fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }

    pub(crate) fn with_help(mut self, help: Option<String>) -> Self {
        self.help = help;
        self
    }

    pub(crate) fn with_argument(mut self, argument: Option<String>) -> Self {
        self.argument = argument;
        self
    }

    fn is_positional(&self) -> bool {
        self.keys.is_empty()
    }

    /// The display name of the value taken by this parameter.
    /// Without an explicit argument name, named options derive one from their longest key (the first, on ties).
    fn metavar(&self) -> Option<String> {
        if self.flag {
            return None;
        }

        if let Some(argument) = &self.argument {
            return Some(argument.clone());
        }

        if self.is_positional() {
            Some(self.name.clone())
        } else {
            self.keys
                .iter()
                .rev()
                .max_by_key(|key| key.chars().count())
                .map(|key| key.trim_start_matches('-').to_ascii_uppercase().replace('-', "_"))
        }
    }

    fn summary(&self) -> String {
        let grammar = match (self.keys.first(), self.metavar()) {
            (Some(key), Some(metavar)) => format!("{key} {metavar}"),
            (Some(key), None) => key.clone(),
            (None, Some(metavar)) => metavar,
            (None, None) => self.name.clone(),
        };

        if self.required {
            grammar
        } else {
            format!("[{grammar}]")
        }
    }

    fn left(&self) -> String {
        if self.is_positional() {
            self.metavar().unwrap_or_else(|| self.name.clone())
        } else {
            match self.metavar() {
                Some(metavar) => format!("{} {metavar}", self.keys.join(", ")),
                None => self.keys.join(", "),
            }
        }
    }

    fn middle(&self) -> String {
        let help = self.help.as_deref().unwrap_or_default();

        if self.choices.is_empty() {
            help.to_string()
        } else {
            format!("{{{}}} {help}", self.choices.join(", "))
                .trim_end()
                .to_string()
        }
    }
}

pub(crate) struct Printer {
    program: String,
    version: Option<String>,
    about: Option<String>,
    parameters: Vec<ParameterDoc>,
    terminal_width: usize,
}

const FALLBACK_TERMINAL_WIDTH: usize = 80;
const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 1;

impl Printer {
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self::new("program", None, None, Vec::default(), FALLBACK_TERMINAL_WIDTH)
    }

    pub(crate) fn terminal(
        program: impl Into<String>,
        version: Option<String>,
        about: Option<String>,
        parameters: Vec<ParameterDoc>,
    ) -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            terminal_width as usize
        } else {
            FALLBACK_TERMINAL_WIDTH
        };

        Self::new(program, version, about, parameters, terminal_width)
    }

    pub(crate) fn new(
        program: impl Into<String>,
        version: Option<String>,
        about: Option<String>,
        parameters: Vec<ParameterDoc>,
        terminal_width: usize,
    ) -> Self {
        Self {
            program: program.into(),
            version,
            about,
            parameters,
            terminal_width,
        }
    }

    #[cfg(test)]
    pub(crate) fn details(&self) -> (String, Option<String>, Option<String>) {
        (
            self.program.clone(),
            self.version.clone(),
            self.about.clone(),
        )
    }

    /// The `<program> <version>` line.
    pub(crate) fn version(&self) -> String {
        match &self.version {
            Some(version) => format!("{} {version}", self.program),
            None => self.program.clone(),
        }
    }

    /// Render the full help message.
    pub(crate) fn help(&self) -> String {
        let (positionals, named): (Vec<&ParameterDoc>, Vec<&ParameterDoc>) = self
            .parameters
            .iter()
            .partition(|parameter| parameter.is_positional());
        let left_column_width = self
            .parameters
            .iter()
            .map(|parameter| parameter.left().chars().count())
            .max()
            .unwrap_or_default();
        let middle_column_width = self
            .parameters
            .iter()
            .map(|parameter| parameter.middle().chars().count())
            .max()
            .unwrap_or_default();
        let column_renderer = ColumnRenderer::guided(
            MAIN_INDENT,
            PADDING_WIDTH,
            left_column_width,
            middle_column_width,
            self.terminal_width,
        );
        let mut lines = vec![self.version()];

        if let Some(about) = &self.about {
            lines.push(about.clone());
        }

        lines.push("".to_string());
        let summary: Vec<String> = named
            .iter()
            .chain(positionals.iter())
            .map(|parameter| parameter.summary())
            .collect();

        if summary.is_empty() {
            lines.push(format!("usage: {}", self.program));
        } else {
            lines.push(format!("usage: {} {}", self.program, summary.join(" ")));
        }

        for (title, parameters) in [("positional arguments:", &positionals), ("options:", &named)] {
            if !parameters.is_empty() {
                lines.push("".to_string());
                lines.push(title.to_string());

                for parameter in parameters.iter() {
                    lines.extend(column_renderer.render(&parameter.left(), &parameter.middle()));
                }
            }
        }

        lines.join("\n")
    }

    pub(crate) fn print_help(&self, user_interface: &(impl UserInterface + ?Sized)) {
        user_interface.print(self.help());
    }

    pub(crate) fn print_version(&self, user_interface: &(impl UserInterface + ?Sized)) {
        user_interface.print(self.version());
    }
}

/// The tokens of the command line, with a caret under the token at `offset`.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ErrorContext {
    offset: usize,
    tokens: Vec<String>,
}

impl ErrorContext {
    pub(crate) fn new(offset: usize, tokens: &[&str]) -> Self {
        Self {
            offset,
            tokens: tokens.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tokens_length = 0;
        let mut projection = String::default();
        let mut projection_offset = 0;

        for (i, token) in self.tokens.iter().enumerate() {
            tokens_length += token.chars().count();
            projection.push_str(token);

            if i + 1 < self.tokens.len() {
                projection.push(' ');

                // Count the spaces which precede the offset.
                if tokens_length <= self.offset {
                    projection_offset += 1;
                }
            }
        }

        write!(
            f,
            "{projection}\n{:width$}^",
            "",
            width = std::cmp::min(self.offset, tokens_length.saturating_sub(1)) + projection_offset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::util::InMemoryInterface;
    use rstest::rstest;

    fn keys(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> Vec<ParameterDoc> {
        vec![
            ParameterDoc::named(keys(&["-h", "--help"]))
                .with_flag(true)
                .with_help(Some("Show this help message and exit.".to_string())),
            ParameterDoc::named(keys(&["-c", "--cfg"]))
                .with_required(true)
                .with_help(Some("Sets the config file.".to_string())),
            ParameterDoc::positional("INPUT").with_help(Some("Input file.".to_string())),
            ParameterDoc::named(keys(&["--level"]))
                .with_choices(keys(&["low", "high"]))
                .with_help(Some("Verbosity.".to_string())),
        ]
    }

    #[test]
    fn help_empty() {
        // Setup
        let printer = Printer::empty();

        // Execute
        let message = printer.help();

        // Verify
        assert_eq!(message, "program\n\nusage: program");
    }

    #[test]
    fn help() {
        // Setup
        let printer = Printer::new(
            "sample",
            Some("1.0.0".to_string()),
            Some("Some useful program.".to_string()),
            sample(),
            100,
        );

        // Execute
        let message = printer.help();

        // Verify
        assert_eq!(
            message,
            r#"sample 1.0.0
Some useful program.

usage: sample [-h] -c CFG [--level LEVEL] [INPUT]

positional arguments:
 INPUT           Input file.

options:
 -h, --help      Show this help message and exit.
 -c, --cfg CFG   Sets the config file.
 --level LEVEL   {low, high} Verbosity."#
        );
    }

    #[test]
    fn help_narrow() {
        // Setup
        let printer = Printer::new("sample", None, None, sample(), 42);

        // Execute
        let message = printer.help();

        // Verify
        assert_eq!(
            message,
            r#"sample

usage: sample [-h] -c CFG [--level LEVEL] [INPUT]

positional arguments:
 INPUT           Input file.

options:
 -h, --help      Show this help message
                 and exit.
 -c, --cfg CFG   Sets the config file.
 --level LEVEL   {low, high} Verbosity."#
        );
    }

    #[test]
    fn help_deterministic() {
        let printer = Printer::new("sample", None, None, sample(), 100);
        assert_eq!(printer.help(), printer.help());
    }

    #[test]
    fn help_argument_names() {
        // Setup
        let printer = Printer::new(
            "program",
            None,
            None,
            vec![
                ParameterDoc::named(keys(&["-o", "--output-dir"])).with_required(true),
                ParameterDoc::named(keys(&["-n"])).with_argument(Some("COUNT".to_string())),
                ParameterDoc::positional("items").with_argument(Some("ITEM".to_string())),
            ],
            100,
        );

        // Execute
        let message = printer.help();

        // Verify
        assert_eq!(
            message,
            r#"program

usage: program -o OUTPUT_DIR [-n COUNT] [ITEM]

positional arguments:
 ITEM

options:
 -o, --output-dir OUTPUT_DIR
 -n COUNT"#
        );
    }

    #[rstest]
    #[case(ParameterDoc::named(keys(&["-v", "--verbose"])).with_flag(true), None)]
    #[case(ParameterDoc::named(keys(&["-c", "--cfg"])), Some("CFG"))]
    #[case(ParameterDoc::named(keys(&["--ab", "--cd"])), Some("AB"))]
    #[case(ParameterDoc::named(keys(&["-cfg"])), Some("CFG"))]
    #[case(ParameterDoc::named(keys(&["--dry-run"])), Some("DRY_RUN"))]
    #[case(ParameterDoc::named(keys(&["-c"])).with_argument(Some("FILE".to_string())), Some("FILE"))]
    #[case(ParameterDoc::positional("input"), Some("input"))]
    fn metavar(#[case] parameter: ParameterDoc, #[case] expected: Option<&str>) {
        assert_eq!(parameter.metavar(), expected.map(|s| s.to_string()));
    }

    #[rstest]
    #[case(None, "program")]
    #[case(Some("1.2.3"), "program 1.2.3")]
    fn version_line(#[case] version: Option<&str>, #[case] expected: &str) {
        // Setup
        let printer = Printer::new(
            "program",
            version.map(|v| v.to_string()),
            None,
            Vec::default(),
            100,
        );
        let interface = InMemoryInterface::default();

        // Execute
        printer.print_version(&interface);

        // Verify
        assert_eq!(interface.messages(), expected);
    }

    #[test]
    fn print_help() {
        // Setup
        let printer = Printer::empty();
        let interface = InMemoryInterface::default();

        // Execute
        printer.print_help(&interface);

        // Verify
        assert_eq!(interface.messages(), printer.help());
        assert_eq!(interface.errors(), "");
    }

    #[rstest]
    #[case(vec![], 0, "\n^")]
    #[case(vec!["abc"], 0, "abc\n^")]
    #[case(vec!["abc"], 2, "abc\n  ^")]
    #[case(vec!["abc"], 5, "abc\n  ^")]
    #[case(vec!["-a", "--cfg"], 0, "-a --cfg\n^")]
    #[case(vec!["-a", "--cfg"], 2, "-a --cfg\n   ^")]
    #[case(vec!["--cfg=x", "-a"], 6, "--cfg=x -a\n      ^")]
    #[case(vec!["--cfg=x", "-a"], 7, "--cfg=x -a\n        ^")]
    #[case(vec!["été", "-a"], 3, "été -a\n    ^")]
    fn error_context(#[case] tokens: Vec<&str>, #[case] offset: usize, #[case] expected: &str) {
        assert_eq!(ErrorContext::new(offset, &tokens).to_string(), expected);
    }
}
