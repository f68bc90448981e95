use indexmap::IndexMap;

use crate::{
    exception::{ExcType, RunResult},
    registry::{EnumTypeId, FunctionId, Registry, ScopeId},
    types::str_repr_fmt,
};

/// One concrete value of a projected enum type.
///
/// Immutable and `Copy`: instances are created per call (construction, native
/// return, default construction) and carry only a back-reference to their
/// owning type plus the integer payload. Two instances are equal only when both
/// the type and the payload match, so aliased members (two names, one value)
/// compare equal while equal payloads of different enum types do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct EnumValue {
    type_id: EnumTypeId,
    value: i64,
}

impl EnumValue {
    pub(crate) fn new(type_id: EnumTypeId, value: i64) -> Self {
        Self { type_id, value }
    }

    #[must_use]
    pub fn type_id(self) -> EnumTypeId {
        self.type_id
    }

    /// The integer payload.
    #[must_use]
    pub fn value(self) -> i64 {
        self.value
    }
}

/// A host-language value.
///
/// Everything that crosses the host surface of [`EnumProjection`](crate::EnumProjection)
/// is a `Value`: arguments, attribute results, construction results and native
/// returns. Enum types, scopes and native functions are first-class values that
/// refer back into the shared [`Registry`] by id.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Self>),
    /// Insertion-ordered mapping with string keys (e.g. `E.values`).
    Dict(IndexMap<String, Self>),
    Enum(EnumValue),
    EnumType(EnumTypeId),
    Scope(ScopeId),
    Function(FunctionId),
}

impl Value {
    /// Returns the host type name used in error messages.
    ///
    /// Enum instances report their enum's qualified name so messages read
    /// `'SampleNamespace.Option'` rather than a generic label.
    #[must_use]
    pub fn type_name<'a>(&self, registry: &'a Registry) -> &'a str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Str(_) => "str",
            Self::List(_) => "list",
            Self::Dict(_) => "dict",
            Self::Enum(ev) => registry.enum_type(ev.type_id()).qualname(),
            Self::EnumType(_) => "type",
            Self::Scope(_) => "namespace",
            Self::Function(_) => "builtin_function_or_method",
        }
    }

    /// Host equality.
    ///
    /// `bool`, `int` and `float` compare numerically with each other. Enum
    /// instances only ever equal instances of the same enum type with the same
    /// payload; in particular `E.m == 1` is false even when `E.m` is backed by 1.
    #[must_use]
    pub fn py_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::List(a), Self::List(b)) => a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.py_eq(y)),
            (Self::Dict(a), Self::Dict(b)) => {
                a.len() == b.len() && a.iter().all(|(k, v)| b.get(k).is_some_and(|w| v.py_eq(w)))
            }
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Float(f), other) | (other, Self::Float(f)) => {
                other.as_plain_int().is_some_and(|i| float_as_exact_int(*f) == Some(i))
            }
            _ => match (self.as_plain_int(), other.as_plain_int()) {
                (Some(a), Some(b)) => a == b,
                _ => self == other,
            },
        }
    }

    /// Integer view of `int` and `bool` values only.
    fn as_plain_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Explicit integer conversion, as performed by `int(x)` in the host.
    ///
    /// Unlike argument passing, this does accept enum instances.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Enum(ev) => Some(ev.value()),
            other => other.as_plain_int(),
        }
    }

    #[must_use]
    pub fn as_enum(&self) -> Option<EnumValue> {
        match self {
            Self::Enum(ev) => Some(*ev),
            _ => None,
        }
    }

    /// Writes the host `repr` of this value.
    pub(crate) fn repr_fmt(&self, f: &mut impl std::fmt::Write, registry: &Registry) -> std::fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Str(s) => str_repr_fmt(s, f),
            Self::List(items) => {
                f.write_char('[')?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.repr_fmt(f, registry)?;
                }
                f.write_char(']')
            }
            Self::Dict(items) => {
                f.write_char('{')?;
                for (i, (key, item)) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    str_repr_fmt(key, f)?;
                    f.write_str(": ")?;
                    item.repr_fmt(f, registry)?;
                }
                f.write_char('}')
            }
            Self::Enum(ev) => {
                let enum_type = registry.enum_type(ev.type_id());
                match registry.member_name(*ev) {
                    Some(name) => write!(f, "{}.{name}", enum_type.qualname()),
                    None => write!(f, "{}({})", enum_type.qualname(), ev.value()),
                }
            }
            Self::EnumType(id) => write!(f, "<class '{}'>", registry.enum_type(*id).qualname()),
            Self::Scope(id) => write!(f, "<namespace '{}'>", registry.scope(*id).qualname()),
            Self::Function(id) => write!(f, "<built-in function {}>", registry.function(*id).name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<EnumValue> for Value {
    fn from(ev: EnumValue) -> Self {
        Self::Enum(ev)
    }
}

/// 2^63, the first float above `i64::MAX`; `-I64_BOUND` is exactly `i64::MIN`.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

/// The integer a float represents exactly, if it is integral and within `i64`.
fn float_as_exact_int(f: f64) -> Option<i64> {
    (f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f)).then_some(f as i64)
}

/// Truncating float to integer conversion, as `int(3.9) == 3`.
pub(crate) fn float_to_int(f: f64) -> RunResult<i64> {
    float_as_exact_int(f.trunc()).ok_or_else(|| ExcType::float_int_conversion_error(f))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(type_index: usize, value: i64) -> EnumValue {
        EnumValue::new(EnumTypeId::new(type_index), value)
    }

    #[test]
    fn numeric_values_compare_across_types() {
        assert!(Value::Int(1).py_eq(&Value::Bool(true)));
        assert!(Value::Float(2.0).py_eq(&Value::Int(2)));
        assert!(Value::Int(2).py_eq(&Value::Float(2.0)));
        assert!(!Value::Int(2).py_eq(&Value::Float(2.5)));
    }

    #[test]
    fn int_float_equality_is_exact_past_f64_precision() {
        let two_pow_53 = 9_007_199_254_740_992_i64;
        assert!(Value::Int(two_pow_53).py_eq(&Value::Float(9_007_199_254_740_992.0)));
        assert!(!Value::Int(two_pow_53 + 1).py_eq(&Value::Float(9_007_199_254_740_992.0)));
        assert!(!Value::Float(9_007_199_254_740_992.0).py_eq(&Value::Int(two_pow_53 + 1)));
        assert!(!Value::Int(i64::MAX).py_eq(&Value::Float(9_223_372_036_854_775_808.0)));
        assert!(Value::Int(i64::MIN).py_eq(&Value::Float(-9_223_372_036_854_775_808.0)));
        assert!(!Value::Int(0).py_eq(&Value::Float(f64::NAN)));
    }

    #[test]
    fn float_to_int_truncates_within_range() {
        assert_eq!(float_to_int(3.9), Ok(3));
        assert_eq!(float_to_int(-3.9), Ok(-3));
        assert_eq!(float_to_int(-0.5), Ok(0));
        assert_eq!(float_to_int(-9_223_372_036_854_775_808.0), Ok(i64::MIN));
        assert_eq!(
            float_to_int(9_223_372_036_854_775_808.0).unwrap_err().exc_type(),
            ExcType::OverflowError
        );
        assert_eq!(float_to_int(1e300).unwrap_err().exc_type(), ExcType::OverflowError);
        assert_eq!(float_to_int(f64::INFINITY).unwrap_err().exc_type(), ExcType::OverflowError);
        assert_eq!(float_to_int(f64::NAN).unwrap_err().exc_type(), ExcType::ValueError);
    }

    #[test]
    fn enum_never_equals_bare_int() {
        let one = Value::Enum(ev(0, 1));
        assert!(!one.py_eq(&Value::Int(1)));
        assert!(!Value::Int(1).py_eq(&one));
        assert!(!one.py_eq(&Value::Float(1.0)));
    }

    #[test]
    fn enum_equality_needs_same_type() {
        assert!(Value::Enum(ev(0, 2)).py_eq(&Value::Enum(ev(0, 2))));
        assert!(!Value::Enum(ev(0, 2)).py_eq(&Value::Enum(ev(1, 2))));
    }

    #[test]
    fn explicit_int_conversion_accepts_enums() {
        assert_eq!(Value::Enum(ev(0, 7)).as_int(), Some(7));
        assert_eq!(Value::Bool(true).as_int(), Some(1));
        assert_eq!(Value::from("7").as_int(), None);
    }

    #[test]
    fn containers_compare_elementwise() {
        let a = Value::List(vec![Value::Int(1), Value::Enum(ev(0, 1))]);
        let b = Value::List(vec![Value::Bool(true), Value::Enum(ev(0, 1))]);
        assert!(a.py_eq(&b));
        let c = Value::List(vec![Value::Int(1), Value::Int(1)]);
        assert!(!a.py_eq(&c));
    }
}
