use crate::api::{Bindable, Convert, InvalidConversion};
use crate::parser::{AnonymousCapturable, Capture, ParameterDoc};
use crate::registry::{Builtin, DeclarationError, Descriptor};

/// The typed runtime state of a parameter: its current value, default, binding and callback.
pub(crate) struct AnonymousCapture<'a, T> {
    field: Box<dyn Bindable<T> + 'a>,
    value: Option<T>,
    default: Option<T>,
    callback: Option<Box<dyn FnMut(&T) + 'a>>,
}

impl<'a, T> AnonymousCapture<'a, T> {
    pub(crate) fn bind(field: impl Bindable<T> + 'a) -> Self {
        Self {
            field: Box::new(field),
            value: None,
            default: None,
            callback: None,
        }
    }

    fn assign(&mut self, value: T) {
        self.field.store(&value);
        self.value.replace(value);
    }
}

impl<'a, T: Convert> AnonymousCapturable for AnonymousCapture<'a, T> {
    fn capture(&mut self, token: &str) -> Result<(), InvalidConversion> {
        let value = T::convert(token)?;
        self.assign(value);
        Ok(())
    }

    fn restore_default(&mut self) -> bool {
        match self.default.take() {
            Some(value) => {
                self.assign(value);
                true
            }
            None => false,
        }
    }

    fn dispatch(&mut self) {
        if let (Some(callback), Some(value)) = (self.callback.as_mut(), self.value.as_ref()) {
            callback(value);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ParameterClass {
    Named,
    Positional,
}

pub(crate) struct ParameterInner<'a, T> {
    class: ParameterClass,
    capture: AnonymousCapture<'a, T>,
    keys: Vec<String>,
    name: String,
    flag: bool,
    required: bool,
    overruling: bool,
    choices: Vec<String>,
    help: Option<String>,
    argument: Option<String>,
    builtin: Option<Builtin>,
}

impl<'a, T> ParameterInner<'a, T> {
    /// Check the declaration errors which are local to this parameter.
    pub(crate) fn check(&self) -> Result<(), DeclarationError> {
        if self.class == ParameterClass::Named && self.keys.is_empty() {
            Err(DeclarationError::MissingKey)
        } else {
            Ok(())
        }
    }
}

impl<'a, T> std::fmt::Debug for ParameterInner<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let class = match &self.class {
            ParameterClass::Named => "Named",
            ParameterClass::Positional => "Positional",
        };
        let name = match &self.class {
            ParameterClass::Named => self.keys.join(", "),
            ParameterClass::Positional => self.name.clone(),
        };
        let help = if let Some(d) = &self.help {
            format!(", {d}")
        } else {
            "".to_string()
        };

        write!(
            f,
            "{class}[{t}, {name}{help}]",
            t = std::any::type_name::<T>(),
        )
    }
}

impl<'a, T> From<&ParameterInner<'a, T>> for Descriptor {
    fn from(value: &ParameterInner<'a, T>) -> Self {
        let descriptor = match value.class {
            ParameterClass::Named => Descriptor::named(value.keys.clone()),
            ParameterClass::Positional => Descriptor::positional(value.name.clone()),
        };

        descriptor
            .with_flag(value.flag)
            .with_required(value.required)
            .with_overruling(value.overruling)
            .with_choices(value.choices.clone())
            .with_builtin(value.builtin)
    }
}

impl<'a, T: Convert + 'a> From<ParameterInner<'a, T>> for Capture<'a> {
    fn from(value: ParameterInner<'a, T>) -> Self {
        let descriptor = Descriptor::from(&value);
        let ParameterInner { capture, .. } = value;
        (descriptor, Box::new(capture))
    }
}

impl<'a, T> From<&ParameterInner<'a, T>> for ParameterDoc {
    fn from(value: &ParameterInner<'a, T>) -> Self {
        match value.class {
            ParameterClass::Named => ParameterDoc::named(value.keys.clone()),
            ParameterClass::Positional => ParameterDoc::positional(value.name.clone()),
        }
        .with_flag(value.flag)
        .with_required(value.required)
        .with_choices(value.choices.clone())
        .with_help(value.help.clone())
        .with_argument(value.argument.clone())
    }
}

/// A named or positional option for the command line parser.
/// Used with [`CommandLineParser::add`](./struct.CommandLineParser.html#method.add).
///
/// A parameter is configured fluently; each configuration method consumes and returns the parameter.
pub struct Parameter<'a, T>(ParameterInner<'a, T>);

impl<'a, T> Parameter<'a, T> {
    /// Create a named option, matched on the Cli by any of its `keys`.
    ///
    /// Keys are matched literally (ex: `-c`, `--cfg`, or even `-cfg`).
    /// Empty keys are ignored, but at least one non-empty key must remain.
    ///
    /// ### Example
    /// ```
    /// # use clarg_builder as clarg;
    /// use clarg::{Parameter, Scalar};
    ///
    /// let mut config: String = String::default();
    /// Parameter::option(Scalar::new(&mut config), ["-c", "--cfg"]);
    /// ```
    pub fn option<K: Into<String>>(
        field: impl Bindable<T> + 'a,
        keys: impl IntoIterator<Item = K>,
    ) -> Self {
        Self(ParameterInner {
            class: ParameterClass::Named,
            capture: AnonymousCapture::bind(field),
            keys: keys
                .into_iter()
                .map(Into::into)
                .filter(|key: &String| !key.is_empty())
                .collect(),
            name: String::default(),
            flag: false,
            required: false,
            overruling: false,
            choices: Vec::default(),
            help: None,
            argument: None,
            builtin: None,
        })
    }

    /// Create a positional option, matched on the Cli by its position amongst the non-option tokens.
    /// The `name` is used for display only.
    ///
    /// ### Example
    /// ```
    /// # use clarg_builder as clarg;
    /// use clarg::{Parameter, Scalar};
    ///
    /// let mut input: String = String::default();
    /// Parameter::positional(Scalar::new(&mut input), "INPUT");
    /// ```
    pub fn positional(field: impl Bindable<T> + 'a, name: impl Into<String>) -> Self {
        Self(ParameterInner {
            class: ParameterClass::Positional,
            capture: AnonymousCapture::bind(field),
            keys: Vec::default(),
            name: name.into(),
            flag: false,
            required: false,
            overruling: false,
            choices: Vec::default(),
            help: None,
            argument: None,
            builtin: None,
        })
    }

    /// Require the parameter to be set by the end of parsing (via the Cli or its default).
    pub fn required(self) -> Self {
        let mut inner = self.0;
        inner.required = true;
        Self(inner)
    }

    /// Treat the named option as a flag: it takes no value token.
    ///
    /// A flag's presence captures the empty token `""`, which converts to `true` for `bool`.
    ///
    /// ### Example
    /// ```
    /// # use clarg_builder as clarg;
    /// use clarg::{CommandLineParser, Parameter, Scalar};
    ///
    /// let mut silent: bool = false;
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option(Scalar::new(&mut silent), ["-s"]).flag())
    ///     .build();
    ///
    /// parser.parse_tokens(&["program", "-s"]).unwrap();
    /// assert!(silent);
    /// ```
    pub fn flag(self) -> Self {
        let mut inner = self.0;
        inner.flag = true;
        Self(inner)
    }

    /// Mark the parameter as overruling.
    ///
    /// When an overruling parameter appears on the Cli, parsing short-circuits after the scan:
    /// only its own callback is invoked, and required parameters are not enforced.
    /// Help and version requests are typical overruling parameters.
    pub fn overruling(self) -> Self {
        let mut inner = self.0;
        inner.overruling = true;
        Self(inner)
    }

    /// The value to apply when the parameter does not appear on the Cli.
    /// If repeated, only the final value will apply.
    ///
    /// A defaulted parameter always satisfies [`Parameter::required`].
    /// The default is also written to the parameter's field, but does not trigger its callback.
    pub fn default_value(self, value: T) -> Self {
        let mut inner = self.0;
        inner.capture.default.replace(value);
        Self(inner)
    }

    /// Restrict the raw Cli values accepted by this named option.
    /// If repeated, only the final choices will apply.
    ///
    /// ### Example
    /// ```
    /// # use clarg_builder as clarg;
    /// use clarg::{CommandLineParser, Parameter, Scalar};
    ///
    /// let mut level: String = String::default();
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option(Scalar::new(&mut level), ["--level"]).choices(["low", "high"]))
    ///     .build();
    ///
    /// assert!(parser.parse_tokens(&["program", "--level", "medium"]).is_err());
    /// ```
    pub fn choices<C: Into<String>>(self, choices: impl IntoIterator<Item = C>) -> Self {
        let mut inner = self.0;
        inner.choices = choices.into_iter().map(Into::into).collect();
        Self(inner)
    }

    /// Invoke `callback` with the parameter's value once parsing succeeds.
    /// If repeated, only the final callback will apply.
    ///
    /// Callbacks run after validation, in the order the parameters appeared on the Cli.
    ///
    /// ### Example
    /// ```
    /// # use clarg_builder as clarg;
    /// use clarg::{CommandLineParser, Detached, Parameter};
    /// use std::cell::RefCell;
    ///
    /// let seen: RefCell<Vec<String>> = RefCell::default();
    /// let parser = CommandLineParser::new("program")
    ///     .add(Parameter::option(Detached::default(), ["-a"])
    ///         .callback(|v: &u32| seen.borrow_mut().push(format!("a={v}"))))
    ///     .add(Parameter::option(Detached::default(), ["-b"])
    ///         .callback(|v: &u32| seen.borrow_mut().push(format!("b={v}"))))
    ///     .build();
    ///
    /// parser.parse_tokens(&["program", "-b", "2", "-a", "1"]).unwrap();
    /// assert_eq!(seen.into_inner(), vec!["b=2", "a=1"]);
    /// ```
    pub fn callback(self, callback: impl FnMut(&T) + 'a) -> Self {
        let mut inner = self.0;
        inner.capture.callback = Some(Box::new(callback));
        Self(inner)
    }

    /// Document the help message for this parameter.
    /// If repeated, only the final message will apply to the parameter.
    ///
    /// A help message describes the parameter in full sentence/paragraph format.
    /// We recommend allowing `clarg` to format this field (ex: it is not recommended to use line breaks `'\n'`).
    pub fn help(self, description: impl Into<String>) -> Self {
        let mut inner = self.0;
        inner.help = Some(description.into());
        Self(inner)
    }

    /// Document the name of the value taken by this parameter.
    /// If repeated, only the final name will apply to the parameter.
    ///
    /// Without it, named options display a name derived from their longest key (ex: `--cfg` displays `CFG`).
    pub fn argument(self, name: impl Into<String>) -> Self {
        let mut inner = self.0;
        inner.argument = Some(name.into());
        Self(inner)
    }

    pub(crate) fn builtin(self, builtin: Builtin) -> Self {
        let mut inner = self.0;
        inner.builtin = Some(builtin);
        Self(inner)
    }

    pub(crate) fn consume(self) -> ParameterInner<'a, T> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Detached, Optional, Scalar};
    use std::cell::RefCell;

    #[test]
    fn option() {
        let mut flag: bool = false;
        let option = Parameter::option(Scalar::new(&mut flag), ["-f", "--flag"]).consume();

        assert_eq!(option.class, ParameterClass::Named);
        assert_eq!(option.keys, vec!["-f".to_string(), "--flag".to_string()]);
        assert!(!option.flag);
        assert!(!option.required);
        assert!(!option.overruling);
        assert_eq!(option.choices, Vec::<String>::default());
        assert_eq!(option.help, None);
        assert_eq!(option.argument, None);
        assert_eq!(option.builtin, None);
    }

    #[test]
    fn option_empty_keys_ignored() {
        let mut value: u32 = 0;
        let option = Parameter::option(Scalar::new(&mut value), ["", "--value"]).consume();
        assert_eq!(option.keys, vec!["--value".to_string()]);

        let option = Parameter::option(Detached::<u32>::default(), [""; 2]).consume();
        assert!(option.keys.is_empty());
    }

    #[test]
    fn option_configured() {
        let mut level: String = String::default();
        let option = Parameter::option(Scalar::new(&mut level), ["--level"])
            .required()
            .overruling()
            .flag()
            .choices(["--this will get discarded--"])
            .choices(vec!["low".to_string(), "high".to_string()])
            .help("--this will get discarded--")
            .help("help message")
            .argument("LVL")
            .consume();

        assert!(option.flag);
        assert!(option.required);
        assert!(option.overruling);
        assert_eq!(option.choices, vec!["low".to_string(), "high".to_string()]);
        assert_eq!(option.help, Some("help message".to_string()));
        assert_eq!(option.argument, Some("LVL".to_string()));
    }

    #[test]
    fn option_check() {
        let option = Parameter::option(Detached::<u32>::default(), ["-v"]).consume();
        assert_eq!(option.check(), Ok(()));

        let option = Parameter::option(Detached::<u32>::default(), Vec::<String>::new()).consume();
        assert_eq!(option.check(), Err(DeclarationError::MissingKey));

        let positional = Parameter::positional(Detached::<u32>::default(), "ITEM").consume();
        assert_eq!(positional.check(), Ok(()));
    }

    #[test]
    fn positional() {
        let mut item: Option<u32> = None;
        let positional = Parameter::positional(Optional::new(&mut item), "ITEM")
            .help("help message")
            .consume();

        assert_eq!(positional.class, ParameterClass::Positional);
        assert_eq!(positional.name, "ITEM");
        assert!(positional.keys.is_empty());
        assert_eq!(positional.help, Some("help message".to_string()));
    }

    #[test]
    fn descriptor_from_inner() {
        let mut value: u32 = 0;
        let option = Parameter::option(Scalar::new(&mut value), ["-v", "--value"])
            .required()
            .choices(["1", "2"])
            .consume();
        let descriptor = Descriptor::from(&option);

        assert_eq!(
            descriptor,
            Descriptor::named(vec!["-v".to_string(), "--value".to_string()])
                .with_required(true)
                .with_choices(vec!["1".to_string(), "2".to_string()])
        );
    }

    #[test]
    fn capture_value() {
        let mut variable: u32 = 0;
        let (_, mut capture) =
            Capture::from(Parameter::option(Scalar::new(&mut variable), ["-v"]).consume());

        capture.capture("5").unwrap();
        capture.capture("7").unwrap();
        assert_matches!(capture.capture("x"), Err(InvalidConversion { .. }));
        drop(capture);

        assert_eq!(variable, 7);
    }

    #[test]
    fn capture_default() {
        let mut variable: String = String::default();
        let (_, mut capture) = Capture::from(
            Parameter::option(Scalar::new(&mut variable), ["-v"])
                .default_value("abc".to_string())
                .consume(),
        );

        assert!(capture.restore_default());
        // The default is only available once.
        assert!(!capture.restore_default());
        drop(capture);

        assert_eq!(variable, "abc");
    }

    #[test]
    fn capture_without_default() {
        let mut variable: u32 = 3;
        let (_, mut capture) =
            Capture::from(Parameter::option(Scalar::new(&mut variable), ["-v"]).consume());

        assert!(!capture.restore_default());
        drop(capture);

        assert_eq!(variable, 3);
    }

    #[test]
    fn capture_dispatch() {
        let seen: RefCell<Vec<f64>> = RefCell::new(Vec::default());
        let (_, mut capture) = Capture::from(
            Parameter::option(Detached::default(), ["-v"])
                .callback(|value: &f64| seen.borrow_mut().push(*value))
                .consume(),
        );

        // Nothing to dispatch before a value has been captured.
        capture.dispatch();
        capture.capture("1.5").unwrap();
        capture.dispatch();
        capture.capture("2.5").unwrap();
        capture.dispatch();
        drop(capture);

        assert_eq!(seen.into_inner(), vec![1.5, 2.5]);
    }

    #[test]
    fn debug_format() {
        let mut value: u32 = 0;
        let option = Parameter::option(Scalar::new(&mut value), ["-v", "--value"])
            .help("abc")
            .consume();
        assert_eq!(format!("{option:?}"), "Named[u32, -v, --value, abc]");

        let positional = Parameter::positional(Detached::<String>::default(), "FILE").consume();
        assert_eq!(
            format!("{positional:?}"),
            "Positional[alloc::string::String, FILE]"
        );
    }
}
