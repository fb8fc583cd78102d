use std::marker::PhantomData;

/// Behaviour to mirror a parameter's value into caller owned storage.
///
/// We use this at the bottom of the command line parser object graph so the compiler can maintain each field's type.
#[doc(hidden)]
pub trait Bindable<T> {
    /// Write the parameter's current value into the bound storage.
    fn store(&mut self, value: &T);
}

/// A parameter field bound to a variable of type `T`.
///
/// Each time the parameter receives a value (from the Cli or its default), the variable is overwritten.
pub struct Scalar<'a, T> {
    variable: &'a mut T,
}

impl<'a, T> Scalar<'a, T> {
    /// Create a scalar field.
    pub fn new(variable: &'a mut T) -> Self {
        Self { variable }
    }
}

impl<'a, T: Clone> Bindable<T> for Scalar<'a, T> {
    fn store(&mut self, value: &T) {
        *self.variable = value.clone();
    }
}

/// A parameter field bound to a variable of type [`Option<T>`].
///
/// The variable is left untouched until the parameter receives a value, at which point it becomes `Some`.
pub struct Optional<'a, T> {
    variable: &'a mut Option<T>,
}

impl<'a, T> Optional<'a, T> {
    /// Create an optional field.
    pub fn new(variable: &'a mut Option<T>) -> Self {
        Self { variable }
    }
}

impl<'a, T: Clone> Bindable<T> for Optional<'a, T> {
    fn store(&mut self, value: &T) {
        self.variable.replace(value.clone());
    }
}

/// A parameter field without any storage.
///
/// Use this when the parameter is only observed through its callback, or only needs to be validated.
pub struct Detached<T> {
    _phantom: PhantomData<T>,
}

impl<T> Default for Detached<T> {
    fn default() -> Self {
        Self {
            _phantom: PhantomData,
        }
    }
}

impl<T> Bindable<T> for Detached<T> {
    fn store(&mut self, _value: &T) {
        // Do nothing.
    }
}
