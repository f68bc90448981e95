use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

/// Result type alias for operations that can raise a host-level exception.
pub type RunResult<T> = Result<T, Exception>;

/// Exception types raised across the binding boundary.
///
/// Uses strum derives for automatic `Display`, `FromStr`, and `Into<&'static str>` implementations.
/// The string representation matches the variant name exactly (e.g., `ValueError` -> "ValueError").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, IntoStaticStr, Serialize, Deserialize)]
pub enum ExcType {
    /// Base class, matches every exception in `is_subclass_of` checks.
    Exception,
    /// A value of the wrong category was supplied (bare int for an enum, text for a number).
    TypeError,
    /// Subclass of TypeError - a constructor or function received the wrong number of arguments.
    ArgumentCountError,
    /// An integer with no matching member was supplied to a non-extensible enum.
    ValueError,
    AttributeError,
    NameError,
    /// A float is too large in magnitude for the 64-bit integer payload.
    OverflowError,
    /// A native function broke its declared contract (e.g. returned the wrong enum type).
    SystemError,
}

impl ExcType {
    /// Checks if this exception type is a subclass of another exception type.
    ///
    /// Returns true if `self` would be caught by `except handler_type:`.
    #[must_use]
    pub fn is_subclass_of(self, handler_type: Self) -> bool {
        if self == handler_type {
            return true;
        }
        match handler_type {
            Self::Exception => true,
            Self::TypeError => self == Self::ArgumentCountError,
            _ => false,
        }
    }

    /// Creates a TypeError for when a callable expecting exactly `expected` arguments receives another count.
    ///
    /// - For 1 expected arg: `{name}() takes exactly one argument ({actual} given)`
    /// - For N expected args: `{name} expected {expected} arguments, got {actual}`
    #[must_use]
    pub(crate) fn type_error_arg_count(name: &str, expected: usize, actual: usize) -> Exception {
        if expected == 1 {
            Exception::new(
                Self::ArgumentCountError,
                format!("{name}() takes exactly one argument ({actual} given)"),
            )
        } else {
            Exception::new(
                Self::ArgumentCountError,
                format!("{name} expected {expected} arguments, got {actual}"),
            )
        }
    }

    /// Creates an arity error for a callable that takes no arguments.
    #[must_use]
    pub(crate) fn type_error_no_args(name: &str, actual: usize) -> Exception {
        Exception::new(
            Self::ArgumentCountError,
            format!("{name}() takes no arguments ({actual} given)"),
        )
    }

    /// Creates an arity error for when a callable receives more arguments than allowed.
    ///
    /// Format: `{name} expected at most {max} argument(s), got {actual}`
    #[must_use]
    pub(crate) fn type_error_at_most(name: &str, max: usize, actual: usize) -> Exception {
        let plural = if max == 1 { "" } else { "s" };
        Exception::new(
            Self::ArgumentCountError,
            format!("{name} expected at most {max} argument{plural}, got {actual}"),
        )
    }

    /// Creates a simple TypeError with a custom message.
    #[must_use]
    pub(crate) fn type_error(msg: impl fmt::Display) -> Exception {
        Exception::new(Self::TypeError, msg)
    }

    /// Creates a TypeError for an enum constructor given a non-integer argument.
    ///
    /// Format: `{qualname}() argument must be an integer, not '{type_name}'`
    #[must_use]
    pub(crate) fn type_error_enum_init(qualname: &str, type_name: &str) -> Exception {
        Exception::new(
            Self::TypeError,
            format!("{qualname}() argument must be an integer, not '{type_name}'"),
        )
    }

    /// Creates a TypeError for calling a value that isn't callable.
    #[must_use]
    pub(crate) fn type_error_not_callable(type_name: &str) -> Exception {
        Exception::new(Self::TypeError, format!("'{type_name}' object is not callable"))
    }

    /// Creates a TypeError for `int()` on a value that has no integer form.
    #[must_use]
    pub(crate) fn type_error_int_conversion(type_name: &str) -> Exception {
        Exception::new(
            Self::TypeError,
            format!("int() argument must be a number or an enum, not '{type_name}'"),
        )
    }

    /// Creates the error for `int()` on a float with no 64-bit integer form.
    ///
    /// NaN is a ValueError; infinities and finite values outside `i64` are OverflowErrors.
    #[must_use]
    pub(crate) fn float_int_conversion_error(value: f64) -> Exception {
        if value.is_nan() {
            Exception::new(Self::ValueError, "cannot convert float NaN to integer")
        } else if value.is_infinite() {
            Exception::new(Self::OverflowError, "cannot convert float infinity to integer")
        } else {
            Exception::new(
                Self::OverflowError,
                format!("float {value:?} does not fit in a 64-bit integer"),
            )
        }
    }

    /// Creates a TypeError for a native call whose argument types don't match its signature.
    ///
    /// The message lists the types actually supplied alongside the supported signature:
    /// ```text
    /// 'getNumber' called with wrong argument types:
    ///   getNumber(int)
    /// Supported signatures:
    ///   getNumber(SampleNamespace.Option)
    /// ```
    #[must_use]
    pub(crate) fn type_error_wrong_argument_types(name: &str, given: &[String], supported: &[String]) -> Exception {
        Exception::new(
            Self::TypeError,
            format!(
                "'{name}' called with wrong argument types:\n  {name}({})\nSupported signatures:\n  {name}({})",
                given.join(", "),
                supported.join(", "),
            ),
        )
    }

    /// Creates a ValueError for an integer with no matching member in a non-extensible enum.
    ///
    /// Format: `{value} is not a valid {qualname}`
    #[must_use]
    pub(crate) fn value_error_not_member(value: i64, qualname: &str) -> Exception {
        Exception::new(Self::ValueError, format!("{value} is not a valid {qualname}"))
    }

    /// Creates an AttributeError for a missing attribute.
    ///
    /// Format: `'{type_name}' object has no attribute '{attr}'`
    #[must_use]
    pub(crate) fn attribute_error(type_name: &str, attr: &str) -> Exception {
        Exception::new(
            Self::AttributeError,
            format!("'{type_name}' object has no attribute '{attr}'"),
        )
    }

    /// Creates an AttributeError for a missing attribute on a scope or enum type.
    ///
    /// Format: `{kind} '{name}' has no attribute '{attr}'`
    #[must_use]
    pub(crate) fn attribute_error_on(kind: &str, name: &str, attr: &str) -> Exception {
        Exception::new(Self::AttributeError, format!("{kind} '{name}' has no attribute '{attr}'"))
    }

    /// Creates a NameError for a top-level name that isn't bound.
    #[must_use]
    pub(crate) fn name_error(name: &str) -> Exception {
        Exception::new(Self::NameError, format!("name '{name}' is not defined"))
    }

    /// Creates a SystemError for a native function that returned a value outside its signature.
    #[must_use]
    pub(crate) fn system_error_bad_return(name: &str, expected: &str, got: impl fmt::Display) -> Exception {
        Exception::new(
            Self::SystemError,
            format!("{name}() returned {got}, expected {expected}"),
        )
    }
}

/// A host-visible exception: its type plus an optional message.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Exception {
    exc_type: ExcType,
    message: Option<String>,
}

impl Exception {
    /// Creates a new exception with the given type and message.
    #[must_use]
    pub fn new(exc_type: ExcType, message: impl fmt::Display) -> Self {
        Self {
            exc_type,
            message: Some(message.to_string()),
        }
    }

    /// Creates a new exception with no message.
    #[must_use]
    pub fn bare(exc_type: ExcType) -> Self {
        Self {
            exc_type,
            message: None,
        }
    }

    #[must_use]
    pub fn exc_type(&self) -> ExcType {
        self.exc_type
    }

    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    #[must_use]
    pub fn into_message(self) -> Option<String> {
        self.message
    }

    /// Returns true if an `except handler_type:` clause would catch this exception.
    #[must_use]
    pub fn matches(&self, handler_type: ExcType) -> bool {
        self.exc_type.is_subclass_of(handler_type)
    }
}

impl fmt::Display for Exception {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_str: &'static str = self.exc_type.into();
        match &self.message {
            Some(msg) => write!(f, "{type_str}: {msg}"),
            None => f.write_str(type_str),
        }
    }
}

impl std::error::Error for Exception {}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn argument_count_error_is_a_type_error() {
        assert!(ExcType::ArgumentCountError.is_subclass_of(ExcType::TypeError));
        assert!(ExcType::ArgumentCountError.is_subclass_of(ExcType::Exception));
        assert!(!ExcType::TypeError.is_subclass_of(ExcType::ArgumentCountError));
        assert!(!ExcType::ValueError.is_subclass_of(ExcType::TypeError));
    }

    #[test]
    fn exc_type_round_trips_through_its_name() {
        assert_eq!(ExcType::from_str("ValueError").unwrap(), ExcType::ValueError);
        assert_eq!(ExcType::ArgumentCountError.to_string(), "ArgumentCountError");
    }

    #[test]
    fn display_includes_message() {
        let exc = ExcType::value_error_not_member(13, "SampleNamespace.InValue");
        assert_eq!(exc.to_string(), "ValueError: 13 is not a valid SampleNamespace.InValue");
        assert_eq!(Exception::bare(ExcType::TypeError).to_string(), "TypeError");
        assert_eq!(exc.into_message().as_deref(), Some("13 is not a valid SampleNamespace.InValue"));
    }

    #[test]
    fn float_conversion_errors_by_kind() {
        let nan = ExcType::float_int_conversion_error(f64::NAN);
        assert_eq!(nan.to_string(), "ValueError: cannot convert float NaN to integer");
        let inf = ExcType::float_int_conversion_error(f64::NEG_INFINITY);
        assert_eq!(inf.to_string(), "OverflowError: cannot convert float infinity to integer");
        let huge = ExcType::float_int_conversion_error(1e300);
        assert_eq!(huge.exc_type(), ExcType::OverflowError);
        assert!(huge.matches(ExcType::Exception));
    }

    #[test]
    fn arg_count_messages() {
        let exc = ExcType::type_error_at_most("InValue", 1, 2);
        assert_eq!(exc.exc_type(), ExcType::ArgumentCountError);
        assert_eq!(exc.message(), Some("InValue expected at most 1 argument, got 2"));

        let exc = ExcType::type_error_arg_count("getNumber", 1, 0);
        assert_eq!(exc.message(), Some("getNumber() takes exactly one argument (0 given)"));
    }
}
