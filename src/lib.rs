//! `clarg` is a declarative command line parser for Rust.
//!
//! Declare the named and positional options of your program, each bound to a variable of its own type,
//! and `clarg` will take care of the rest: matching the command line tokens, converting their values,
//! enforcing the declared constraints, and generating a help message.
//!
//! `clarg` attempts to prioritize the following design concerns:
//! * *Type safe argument parsing*:
//! The user should not call any `&str -> T` conversion functions directly.
//! * *Named vs. positional paradigm*:
//! Named options are matched by their keys (ex: `-c` or `--cfg`), and may appear anywhere on the Cli.
//! Positional options are matched by their order amongst the remaining tokens.
//! * *Deferred callbacks*:
//! Callbacks only run once the whole command line has been validated, in the order their options appeared.
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/basic.rs")]
//! ```
//!
//! This generates the following Cli program:
//! ```console
//! $ basic -h
//! basic 0.1.0
//! Loads a config file, and optionally processes an input.
//!
//! usage: basic [-h] [-V] -c CFG [-v] [--level LEVEL] [INPUT]
//!
//! positional arguments:
//!  INPUT           The input to process.
//!
//! options:
//!  -h, --help      Show this help message and exit.
//!  -V, --version   Show the program version and exit.
//!  -c, --cfg CFG   The config file.
//!  -v, --verbose   Print more output.
//!  --level LEVEL   {low, high} The processing level.
//!
//! $ basic --cfg=app.json in.txt
//! Config: app.json
//! Verbose: false
//! Level: low
//! Input: Some("in.txt")
//!
//! $ basic --cfg app.json --level medium
//! Parse error: Option '--level' does not accept 'medium': expected one of {low, high}.
//! --cfg app.json --level medium
//!                        ^
//! ```
//!
//! # Builder Api
//! Configure `clarg` by starting with a [`CommandLineParser`] and `add`ing parameters.
//! There are two classes of parameters: [`Parameter::option`] and [`Parameter::positional`].
//!
//! Each parameter takes a *field* which binds the parameter's value to your program:
//! * [`Scalar`]: overwrites a variable `T` each time the parameter receives a value.
//! * [`Optional`]: sets a variable `Option<T>` once the parameter receives a value.
//! * [`Detached`]: no variable at all (ex: when the parameter is only observed via [`Parameter::callback`]).
//!
//! All type `T` conversion in `clarg` is controlled by [`prelude::Convert`].
//! `clarg` implements it for the primitive types, `String`, and `PathBuf`.
//! Implement it for your own types, using [`from_str`] for any type which already implements [`std::str::FromStr`].
//!
//! Booleans convert permissively: `""`, `"1"`, and `"true"` are `true`, while any other value is `false`.
//! Since a [`Parameter::flag`] captures the empty token, a `bool` flag is `true` whenever it appears.
//!
//! ### Parsing
//! Parsing proceeds as follows:
//! 1. A token `KEY=VALUE`, where `KEY` is a declared key, is split into `KEY` and `VALUE`.
//! 2. Each token is matched, left to right.
//! A declared key matches its named option, which takes the following token as its value (unless it is a flag).
//! Any other token is assigned to the next positional option.
//! Each value is checked against the option's choices, converted, and stored.
//! 3. If an [`Parameter::overruling`] option was matched, only its callback runs and parsing stops here.
//! 4. Defaults are applied to the options which were not matched.
//! 5. Required options are checked.
//! 6. Callbacks run, in the order their options appeared on the Cli.
//!
//! The result is an [`Outcome`] or a [`ParseError`].
//!
//! # Features
//! * `tracing_debug`: emit `tracing` debug events describing the parse.
pub use clarg_builder::*;
