use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// Behaviour to convert a raw command line token into the value type `T` of a parameter.
///
/// The implementations of `Convert` act as the conversion registry of `clarg`: the declared type `T` of a
/// [`Parameter`](./struct.Parameter.html) selects its converter.
/// Register a converter for your own type by implementing this trait.
/// For any type that already implements [`FromStr`], [`from_str`] does the work.
///
/// ### Example
/// ```
/// # use clarg_builder as clarg;
/// use clarg::prelude::*;
/// use clarg::{from_str, InvalidConversion};
///
/// #[derive(Debug, PartialEq)]
/// struct Port(u16);
///
/// impl std::str::FromStr for Port {
///     type Err = std::num::ParseIntError;
///
///     fn from_str(value: &str) -> Result<Self, Self::Err> {
///         value.parse().map(Port)
///     }
/// }
///
/// impl Convert for Port {
///     fn convert(token: &str) -> Result<Self, InvalidConversion> {
///         from_str(token)
///     }
/// }
///
/// assert_eq!(Port::convert("8080").unwrap(), Port(8080));
/// assert!(Port::convert("http").is_err());
/// ```
pub trait Convert: Sized {
    /// Convert the `token` into this type.
    fn convert(token: &str) -> Result<Self, InvalidConversion>;
}

/// The error raised when a token cannot convert to the parameter's type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("cannot convert '{token}' to {type_name}.")]
pub struct InvalidConversion {
    /// The raw token.
    pub token: String,
    /// The name of the target type.
    pub type_name: &'static str,
}

impl InvalidConversion {
    /// Create a conversion error for the target type `T`.
    pub fn of<T>(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            type_name: std::any::type_name::<T>(),
        }
    }
}

/// Convert a token via [`FromStr`], reporting failures as [`InvalidConversion`].
pub fn from_str<T: FromStr>(token: &str) -> Result<T, InvalidConversion> {
    T::from_str(token).map_err(|_| InvalidConversion::of::<T>(token))
}

macro_rules! convert_from_str {
    ($($t:ty),* $(,)?) => {
        $(
            impl Convert for $t {
                fn convert(token: &str) -> Result<Self, InvalidConversion> {
                    from_str(token)
                }
            }
        )*
    };
}

convert_from_str!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, char,
);

impl Convert for String {
    fn convert(token: &str) -> Result<Self, InvalidConversion> {
        Ok(token.to_string())
    }
}

impl Convert for PathBuf {
    fn convert(token: &str) -> Result<Self, InvalidConversion> {
        Ok(PathBuf::from(token))
    }
}

impl Convert for bool {
    /// Permissive: only `""`, `"1"` and `"true"` are `true`, everything else is `false`.
    /// The empty token is what a flag captures, so a `bool` flag becomes `true` when present.
    fn convert(token: &str) -> Result<Self, InvalidConversion> {
        Ok(token.is_empty() || token == "1" || token == "true")
    }
}
