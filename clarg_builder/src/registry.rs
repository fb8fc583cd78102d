use std::collections::HashMap;
use thiserror::Error;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// An error in the declaration of the command line parser.
/// These are programming errors, reported by `CommandLineParser::build_parser`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeclarationError {
    /// A named option was declared without any non-empty key.
    #[error("Config error: an option must declare at least one non-empty key.")]
    MissingKey,

    /// The same key was declared more than once.
    #[error("Config error: cannot duplicate the key '{0}'.")]
    DuplicateKey(String),

    /// A positional parameter was declared with an empty name.
    #[error("Config error: a positional parameter must have a non-empty name.")]
    EmptyName,

    /// A positional parameter was marked as a flag.
    #[error("Config error: positional parameter '{0}' cannot be a flag.")]
    PositionalFlag(String),

    /// A positional parameter was given a choice set.
    #[error("Config error: positional parameter '{0}' cannot restrict its choices.")]
    PositionalChoices(String),
}

/// Parameters whose dispatch is handled by the parser itself, rather than a user callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Builtin {
    Help,
    Version,
}

/// The untyped half of an option: its identity, constraints, and whether it has been set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Descriptor {
    name: String,
    keys: Vec<String>,
    flag: bool,
    required: bool,
    overruling: bool,
    choices: Vec<String>,
    builtin: Option<Builtin>,
    was_set: bool,
}

impl Descriptor {
    pub(crate) fn named(keys: Vec<String>) -> Self {
        Self {
            name: keys.join(", "),
            keys,
            flag: false,
            required: false,
            overruling: false,
            choices: Vec::default(),
            builtin: None,
            was_set: false,
        }
    }

    pub(crate) fn positional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            keys: Vec::default(),
            flag: false,
            required: false,
            overruling: false,
            choices: Vec::default(),
            builtin: None,
            was_set: false,
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

    pub(crate) fn with_overruling(mut self, overruling: bool) -> Self {
        self.overruling = overruling;
        self
    }

    pub(crate) fn with_choices(mut self, choices: Vec<String>) -> Self {
        self.choices = choices;
        self
    }

    pub(crate) fn with_builtin(mut self, builtin: Option<Builtin>) -> Self {
        self.builtin = builtin;
        self
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn is_positional(&self) -> bool {
        self.keys.is_empty()
    }

    pub(crate) fn is_flag(&self) -> bool {
        self.flag
    }

    pub(crate) fn builtin(&self) -> Option<Builtin> {
        self.builtin
    }

    pub(crate) fn was_set(&self) -> bool {
        self.was_set
    }

    /// Whether the raw `value` is allowed by the choice set (an empty set allows anything).
    pub(crate) fn accepts(&self, value: &str) -> bool {
        self.choices.is_empty() || self.choices.iter().any(|choice| choice == value)
    }

    pub(crate) fn choices(&self) -> &[String] {
        &self.choices
    }
}

/// The table of all declared descriptors.
///
/// Descriptors are kept in declaration order, and indexed by each of their named keys.
#[derive(Debug)]
pub(crate) struct OptionRegistry {
    descriptors: Vec<Descriptor>,
    keys: HashMap<String, usize>,
    positionals: Vec<usize>,
}

impl OptionRegistry {
    pub(crate) fn new(descriptors: Vec<Descriptor>) -> Result<Self, DeclarationError> {
        let mut keys = HashMap::default();
        let mut positionals = Vec::default();

        for (index, descriptor) in descriptors.iter().enumerate() {
            if descriptor.is_positional() {
                if descriptor.name.is_empty() {
                    return Err(DeclarationError::EmptyName);
                }

                if descriptor.flag {
                    return Err(DeclarationError::PositionalFlag(descriptor.name.clone()));
                }

                if !descriptor.choices.is_empty() {
                    return Err(DeclarationError::PositionalChoices(
                        descriptor.name.clone(),
                    ));
                }

                positionals.push(index);
            } else {
                for key in &descriptor.keys {
                    if keys.insert(key.clone(), index).is_some() {
                        return Err(DeclarationError::DuplicateKey(key.clone()));
                    }
                }
            }
        }

        Ok(Self {
            descriptors,
            keys,
            positionals,
        })
    }

    /// Find the descriptor index for a named `key`.
    pub(crate) fn lookup(&self, key: &str) -> Option<usize> {
        self.keys.get(key).copied()
    }

    pub(crate) fn is_key(&self, token: &str) -> bool {
        self.keys.contains_key(token)
    }

    pub(crate) fn descriptor(&self, index: usize) -> &Descriptor {
        &self.descriptors[index]
    }

    #[cfg(test)]
    pub(crate) fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    /// The positional descriptor indices, in declaration order.
    pub(crate) fn positionals(&self) -> &[usize] {
        &self.positionals
    }

    pub(crate) fn mark(&mut self, index: usize) {
        #[cfg(feature = "tracing_debug")]
        {
            debug!("Marking '{}' as set.", self.descriptors[index].name);
        }

        self.descriptors[index].was_set = true;
    }

    /// The first overruling descriptor (in declaration order) which has been set.
    pub(crate) fn overruled(&self) -> Option<usize> {
        self.descriptors
            .iter()
            .position(|descriptor| descriptor.overruling && descriptor.was_set)
    }

    /// The first required descriptor (in declaration order) which has not been set.
    pub(crate) fn missing_required(&self) -> Option<&Descriptor> {
        self.descriptors
            .iter()
            .find(|descriptor| descriptor.required && !descriptor.was_set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn keys(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn registry_empty() {
        let registry = OptionRegistry::new(Vec::default()).unwrap();
        assert!(registry.descriptors().is_empty());
        assert!(registry.positionals().is_empty());
        assert_eq!(registry.lookup("--anything"), None);
        assert_eq!(registry.overruled(), None);
        assert_eq!(registry.missing_required(), None);
    }

    #[test]
    fn registry_lookup() {
        let registry = OptionRegistry::new(vec![
            Descriptor::named(keys(&["-c", "--cfg"])),
            Descriptor::positional("INPUT"),
            Descriptor::named(keys(&["--verbose"])),
            Descriptor::positional("OUTPUT"),
        ])
        .unwrap();

        assert_eq!(registry.lookup("-c"), Some(0));
        assert_eq!(registry.lookup("--cfg"), Some(0));
        assert_eq!(registry.lookup("--verbose"), Some(2));
        assert_eq!(registry.lookup("INPUT"), None);
        assert_eq!(registry.lookup("-v"), None);
        assert!(registry.is_key("--cfg"));
        assert!(!registry.is_key("cfg"));
        assert_eq!(registry.positionals(), &[1, 3]);
        assert_eq!(registry.descriptor(0).name(), "-c, --cfg");
        assert_eq!(registry.descriptor(3).name(), "OUTPUT");
    }

    #[rstest]
    #[case(vec![keys(&["-a"]), keys(&["-a"])], "-a")]
    #[case(vec![keys(&["-a", "--apple"]), keys(&["-b", "--apple"])], "--apple")]
    #[case(vec![keys(&["-a", "-a"])], "-a")]
    fn registry_duplicate_key(#[case] declared: Vec<Vec<String>>, #[case] duplicate: &str) {
        let result = OptionRegistry::new(declared.into_iter().map(Descriptor::named).collect());
        assert_eq!(
            result.unwrap_err(),
            DeclarationError::DuplicateKey(duplicate.to_string())
        );
    }

    #[test]
    fn registry_positional_invalid() {
        assert_matches!(
            OptionRegistry::new(vec![Descriptor::positional("")]),
            Err(DeclarationError::EmptyName)
        );
        assert_matches!(
            OptionRegistry::new(vec![Descriptor::positional("FILE").with_flag(true)]),
            Err(DeclarationError::PositionalFlag(name)) if name == "FILE"
        );
        assert_matches!(
            OptionRegistry::new(vec![
                Descriptor::positional("FILE").with_choices(keys(&["a", "b"]))
            ]),
            Err(DeclarationError::PositionalChoices(name)) if name == "FILE"
        );
    }

    #[test]
    fn registry_positional_may_share_a_key_name() {
        // Positional names are display-only; they never enter the key index.
        let registry = OptionRegistry::new(vec![
            Descriptor::named(keys(&["FILE"])),
            Descriptor::positional("FILE"),
        ])
        .unwrap();
        assert_eq!(registry.lookup("FILE"), Some(0));
        assert_eq!(registry.positionals(), &[1]);
    }

    #[test]
    fn registry_mark() {
        let mut registry = OptionRegistry::new(vec![
            Descriptor::named(keys(&["-a"])).with_required(true),
            Descriptor::named(keys(&["-b"])).with_required(true),
        ])
        .unwrap();
        assert_eq!(registry.missing_required().unwrap().name(), "-a");

        registry.mark(0);
        assert!(registry.descriptor(0).was_set());
        assert_eq!(registry.missing_required().unwrap().name(), "-b");

        registry.mark(1);
        registry.mark(1);
        assert!(registry.descriptor(1).was_set());
        assert_eq!(registry.missing_required(), None);
    }

    #[test]
    fn registry_overruled() {
        let mut registry = OptionRegistry::new(vec![
            Descriptor::named(keys(&["-a"])),
            Descriptor::named(keys(&["-h"])).with_overruling(true),
            Descriptor::named(keys(&["-V"])).with_overruling(true),
        ])
        .unwrap();
        assert_eq!(registry.overruled(), None);

        registry.mark(0);
        assert_eq!(registry.overruled(), None);

        registry.mark(2);
        assert_eq!(registry.overruled(), Some(2));

        registry.mark(1);
        assert_eq!(registry.overruled(), Some(1));
    }

    #[rstest]
    #[case(vec![], "anything", true)]
    #[case(vec!["a", "b"], "a", true)]
    #[case(vec!["a", "b"], "b", true)]
    #[case(vec!["a", "b"], "c", false)]
    #[case(vec!["a", "b"], "", false)]
    #[case(vec!["a", "b"], "A", false)]
    fn descriptor_accepts(#[case] choices: Vec<&str>, #[case] value: &str, #[case] expected: bool) {
        let descriptor = Descriptor::named(keys(&["-x"])).with_choices(keys(&choices));
        assert_eq!(descriptor.accepts(value), expected);
    }
}
