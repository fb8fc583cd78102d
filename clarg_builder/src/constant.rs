pub(crate) const HELP_KEYS: [&str; 2] = ["-h", "--help"];
pub(crate) const HELP_MESSAGE: &str = "Show this help message and exit.";
pub(crate) const VERSION_KEYS: [&str; 2] = ["-V", "--version"];
pub(crate) const VERSION_MESSAGE: &str = "Show the program version and exit.";
