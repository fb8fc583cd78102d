use std::collections::VecDeque;

/// A raw token of the command line, located by its character offset into the (space-less) input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub(crate) value: String,
    pub(crate) offset: usize,
}

impl Token {
    fn new(value: impl Into<String>, offset: usize) -> Self {
        Self {
            value: value.into(),
            offset,
        }
    }

    /// Split a `KEY=VALUE` token, where `KEY` satisfies `is_key`, into the two tokens `KEY` and `VALUE`.
    /// Only the first `=` acts as a separator, so `--key=1=2` splits into `--key` and `1=2`.
    ///
    /// Returns `None` when the token is itself a key, or its prefix is not.
    pub(crate) fn split_key(&self, is_key: impl Fn(&str) -> bool) -> Option<(Token, Token)> {
        match self.value.split_once('=') {
            Some((key, value)) if !is_key(&self.value) && is_key(key) => Some((
                Token::new(key, self.offset),
                // The 1 comes from the '=' separator.
                Token::new(value, self.offset + key.chars().count() + 1),
            )),
            _ => None,
        }
    }
}

/// Locate the raw input tokens (excluding the program name), without altering them.
pub(crate) fn tokenize(tokens: &[&str]) -> VecDeque<Token> {
    let mut out = VecDeque::with_capacity(tokens.len());
    let mut fed = 0;

    for token in tokens {
        out.push_back(Token::new(*token, fed));
        fed += token.chars().count();
    }

    out
}
