use crate::parser::{ErrorContext, ParseError};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

// We'll target 95% of the total width, to ensure the renderer doesn't literally use the full space.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

/// Lays out a two column table: a fixed width left column, and a word wrapped middle column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ColumnRenderer {
    indent: usize,
    padding: usize,
    left: usize,
    middle: usize,
}

impl ColumnRenderer {
    /// Produce a renderer based off the provided widths.
    /// This renderer will use a heuristic to chose the middle width.
    pub(crate) fn guided(
        indent: usize,
        padding: usize,
        left: usize,
        middle: usize,
        total_width: usize,
    ) -> Self {
        let non_middle = indent + left + padding;
        let target_total_width = (total_width as f64 * TARGET_TOTAL_FACTOR) as usize;
        let guided_middle = std::cmp::max(middle, MINIMUM_MIDDLE_WIDTH);

        if guided_middle + non_middle <= target_total_width {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_middle} and middle fit within the target total {target_total_width}.  Selecting middle: {guided_middle}.");
            }

            Self::new(indent, padding, left, guided_middle)
        } else if non_middle < target_total_width {
            let calculated_middle = std::cmp::max(
                target_total_width - non_middle,
                MINIMUM_MIDDLE_WIDTH,
            );

            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_middle} fit within the target total {target_total_width}.  Selecting middle: {calculated_middle}.");
            }

            Self::new(indent, padding, left, calculated_middle)
        } else {
            #[cfg(feature = "tracing_debug")]
            {
                debug!("Columns {non_middle} do not fit within the target total {target_total_width}.  Selecting middle: {MINIMUM_MIDDLE_WIDTH}.");
            }

            Self::new(indent, padding, left, MINIMUM_MIDDLE_WIDTH)
        }
    }

    /// Produce a renderer based off the provided widths.
    pub(crate) fn new(indent: usize, padding: usize, left: usize, middle: usize) -> Self {
        Self {
            indent,
            // Padding must be at least 1, so the columns never run together.
            padding: std::cmp::max(padding, 1),
            left,
            // Middle must be at least 2, so we can hyphenate.
            middle: std::cmp::max(middle, 2),
        }
    }

    /// Render the row `left` | `middle`.
    /// Rows with a long middle text wrap onto further lines, aligned with the middle column.
    pub(crate) fn render(&self, left: &str, middle: &str) -> Vec<String> {
        let ColumnRenderer {
            indent,
            padding,
            left: left_width,
            middle: middle_width,
        } = *self;
        let mut out = Vec::default();

        for (i, part) in chunk(middle, middle_width).iter().enumerate() {
            let line = if i == 0 {
                format!("{:indent$}{left:left_width$}{:padding$}{part}", "", "")
            } else {
                format!("{:indent$}{:left_width$}{:padding$}{part}", "", "", "")
            };
            out.push(line);
        }

        if out.is_empty() {
            out.push(format!("{:indent$}{left}", ""));
        }

        out.into_iter()
            .map(|line| line.trim_end().to_string())
            .collect()
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ').filter(|word| !word.is_empty()) {
        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.chars().count() + word.chars().count() + 1 <= width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let increment = width - 1;
    let mut remaining: Vec<char> = word.chars().collect();

    while remaining.len() > width {
        let rest = remaining.split_off(increment);
        lines.push(format!("{}-", remaining.iter().collect::<String>()));
        remaining = rest;
    }

    current.extend(remaining);
}

pub(crate) trait UserInterface {
    fn print(&self, message: String);
    fn print_error(&self, error: ParseError);
    fn print_error_context(&self, error_context: ErrorContext);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: ParseError) {
        eprintln!("Parse error: {error}");
    }

    fn print_error_context(&self, error_context: ErrorContext) {
        eprintln!("{error_context}");
    }
}
