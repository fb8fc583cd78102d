/// The result of a successful parse.
///
/// Only [`Outcome::Complete`] means the program should carry on; the other variants mean the parser has
/// already handled the invocation (ex: by printing the help message).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every token was matched, and all defaults, requirements, and callbacks were resolved.
    Complete,
    /// An overruling option (named here) short-circuited the parse.
    Overruled(String),
    /// There was nothing to parse beyond the program name, so the help message was printed instead.
    Empty,
}

impl Outcome {
    /// Whether the parse ran to completion.
    pub fn is_complete(&self) -> bool {
        matches!(self, Outcome::Complete)
    }

    /// The process exit code corresponding to this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Complete | Outcome::Overruled(_) => 0,
            Outcome::Empty => 1,
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Complete => write!(f, "complete"),
            Outcome::Overruled(name) => write!(f, "overruled by '{name}'"),
            Outcome::Empty => write!(f, "empty"),
        }
    }
}
