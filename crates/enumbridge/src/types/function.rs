//! The native call boundary.
//!
//! Host arguments are checked against the function's [`Signature`] before the
//! native body runs. Integers are never implicitly converted to enum instances
//! (nor enum instances to integers): a parameter declared as
//! `ParamType::Enum(E)` accepts only instances of `E`. Accepted arguments are
//! marshaled into [`NativeValue`]s, where enums travel as their raw payload, and
//! the native result is marshaled back out against the declared return type.

use std::fmt;

use smallvec::SmallVec;

use crate::{
    args::ArgValues,
    exception::{ExcType, Exception, RunResult},
    native::NativeEnum,
    registry::{EnumTypeId, Registry},
    value::{EnumValue, Value},
};

/// Declared type of a native parameter or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// An instance of exactly this enum type.
    Enum(EnumTypeId),
    /// `int`; `bool` is accepted as in the host.
    Int,
    /// `float`; `int` and `bool` widen.
    Float,
    Str,
    Bool,
    /// Only `None`; used for functions returning nothing.
    Void,
    /// Any scalar: `None`, `bool`, `int`, `float`, `str` or an enum instance.
    ///
    /// Enum results cannot be returned through `Any`, since the raw payload
    /// carries no type.
    Any,
}

impl ParamType {
    /// Host-visible type name used in signature listings.
    pub(crate) fn name<'a>(self, registry: &'a Registry) -> &'a str {
        match self {
            Self::Enum(id) => registry.enum_type(id).qualname(),
            Self::Int => "int",
            Self::Float => "float",
            Self::Str => "str",
            Self::Bool => "bool",
            Self::Void => "None",
            Self::Any => "object",
        }
    }

    /// Checks `value` against this type and marshals it for the native side.
    ///
    /// Returns `None` when the value is of the wrong category.
    fn marshal_in(self, value: &Value) -> Option<NativeValue> {
        match (self, value) {
            (Self::Enum(id), Value::Enum(ev)) if ev.type_id() == id => Some(NativeValue::Enum(ev.value())),
            (Self::Int, Value::Int(i)) => Some(NativeValue::Int(*i)),
            (Self::Int, Value::Bool(b)) => Some(NativeValue::Int(i64::from(*b))),
            (Self::Float, Value::Float(f)) => Some(NativeValue::Float(*f)),
            (Self::Float, Value::Int(i)) => Some(NativeValue::Float(*i as f64)),
            (Self::Float, Value::Bool(b)) => Some(NativeValue::Float(f64::from(u8::from(*b)))),
            (Self::Str, Value::Str(s)) => Some(NativeValue::Str(s.clone())),
            (Self::Bool, Value::Bool(b)) => Some(NativeValue::Bool(*b)),
            (Self::Void | Self::Any, Value::None) => Some(NativeValue::None),
            (Self::Any, Value::Bool(b)) => Some(NativeValue::Bool(*b)),
            (Self::Any, Value::Int(i)) => Some(NativeValue::Int(*i)),
            (Self::Any, Value::Float(f)) => Some(NativeValue::Float(*f)),
            (Self::Any, Value::Str(s)) => Some(NativeValue::Str(s.clone())),
            (Self::Any, Value::Enum(ev)) => Some(NativeValue::Enum(ev.value())),
            _ => None,
        }
    }
}

/// Parameter and return types of a native function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    params: SmallVec<[ParamType; 4]>,
    returns: ParamType,
}

impl Signature {
    pub fn new(params: impl IntoIterator<Item = ParamType>, returns: ParamType) -> Self {
        Self {
            params: params.into_iter().collect(),
            returns,
        }
    }

    #[must_use]
    pub fn params(&self) -> &[ParamType] {
        &self.params
    }

    #[must_use]
    pub fn returns(&self) -> ParamType {
        self.returns
    }
}

/// A value on the native side of the boundary.
///
/// Enums are carried as their raw integer; the boundary re-attaches the enum
/// type when marshaling a result back to the host.
#[derive(Debug, Clone, PartialEq)]
pub enum NativeValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Enum(i64),
}

impl NativeValue {
    /// Wraps a typed native enum for returning across the boundary.
    pub fn from_enum<E: NativeEnum>(value: E) -> Self {
        Self::Enum(value.to_raw())
    }
}

impl fmt::Display for NativeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Bool(b) => write!(f, "bool {b}"),
            Self::Int(i) => write!(f, "int {i}"),
            Self::Float(v) => write!(f, "float {v:?}"),
            Self::Str(s) => write!(f, "str {s:?}"),
            Self::Enum(raw) => write!(f, "enum value {raw}"),
        }
    }
}

/// Arguments as seen by a native function body, already checked against its signature.
#[derive(Debug)]
pub struct NativeArgs<'a> {
    function: &'a str,
    values: SmallVec<[NativeValue; 4]>,
}

impl NativeArgs<'_> {
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&NativeValue> {
        self.values.get(index)
    }

    /// Raw payload of an enum argument.
    pub fn enum_raw(&self, index: usize) -> RunResult<i64> {
        match self.values.get(index) {
            Some(NativeValue::Enum(raw)) => Ok(*raw),
            other => Err(self.unexpected(index, "enum", other)),
        }
    }

    /// Converts an enum argument to its Rust type.
    ///
    /// Fails with `ValueError` when the payload names no variant, which can only
    /// happen for extensible enums.
    pub fn get_enum<E: NativeEnum>(&self, index: usize) -> RunResult<E> {
        let raw = self.enum_raw(index)?;
        E::from_raw(raw).ok_or_else(|| ExcType::value_error_not_member(raw, E::NAME))
    }

    pub fn int(&self, index: usize) -> RunResult<i64> {
        match self.values.get(index) {
            Some(NativeValue::Int(i)) => Ok(*i),
            other => Err(self.unexpected(index, "int", other)),
        }
    }

    pub fn float(&self, index: usize) -> RunResult<f64> {
        match self.values.get(index) {
            Some(NativeValue::Float(v)) => Ok(*v),
            other => Err(self.unexpected(index, "float", other)),
        }
    }

    pub fn str(&self, index: usize) -> RunResult<&str> {
        match self.values.get(index) {
            Some(NativeValue::Str(s)) => Ok(s),
            other => Err(self.unexpected(index, "str", other)),
        }
    }

    pub fn bool(&self, index: usize) -> RunResult<bool> {
        match self.values.get(index) {
            Some(NativeValue::Bool(b)) => Ok(*b),
            other => Err(self.unexpected(index, "bool", other)),
        }
    }

    /// A body asked for an argument its own signature doesn't provide.
    fn unexpected(&self, index: usize, expected: &str, got: Option<&NativeValue>) -> Exception {
        let got = got.map_or_else(|| "nothing".to_owned(), ToString::to_string);
        Exception::new(
            ExcType::SystemError,
            format!(
                "{}(): argument {} is {got}, native code expected {expected}",
                self.function,
                index + 1
            ),
        )
    }
}

/// Native function body.
pub(crate) type NativeFn = dyn Fn(&NativeArgs<'_>) -> RunResult<NativeValue> + Send + Sync;

/// A native function exposed in a scope.
pub struct NativeFunction {
    name: String,
    signature: Signature,
    body: Box<NativeFn>,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl NativeFunction {
    pub(crate) fn new(name: String, signature: Signature, body: Box<NativeFn>) -> Self {
        Self {
            name,
            signature,
            body,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Checks the host arguments, runs the body, and marshals the result back out.
    pub(crate) fn invoke(&self, args: ArgValues, registry: &Registry) -> RunResult<Value> {
        let native_args = self.marshal_args(&args, registry)?;
        let result = (self.body)(&native_args)?;
        self.marshal_return(result, registry)
    }

    fn marshal_args<'a>(&'a self, args: &ArgValues, registry: &Registry) -> RunResult<NativeArgs<'a>> {
        let params = self.signature.params();
        if args.count() != params.len() {
            return Err(ExcType::type_error_arg_count(
                &self.name,
                params.len(),
                args.count(),
            ));
        }
        let mut values = SmallVec::with_capacity(params.len());
        for (param, arg) in params.iter().zip(args.iter()) {
            match param.marshal_in(arg) {
                Some(native) => values.push(native),
                None => return Err(self.wrong_argument_types(args, registry)),
            }
        }
        Ok(NativeArgs {
            function: &self.name,
            values,
        })
    }

    fn wrong_argument_types(&self, args: &ArgValues, registry: &Registry) -> Exception {
        let given: Vec<String> = args.iter().map(|arg| arg.type_name(registry).to_owned()).collect();
        let supported: Vec<String> = self
            .signature
            .params()
            .iter()
            .map(|param| param.name(registry).to_owned())
            .collect();
        ExcType::type_error_wrong_argument_types(&self.name, &given, &supported)
    }

    fn marshal_return(&self, result: NativeValue, registry: &Registry) -> RunResult<Value> {
        let returns = self.signature.returns();
        let value = match (returns, result) {
            (ParamType::Enum(id), NativeValue::Enum(raw)) => {
                let enum_type = registry.enum_type(id);
                if !enum_type.accepts(raw) {
                    return Err(Exception::new(
                        ExcType::SystemError,
                        format!(
                            "{}() returned {raw}, which is not a valid {}",
                            self.name,
                            enum_type.qualname()
                        ),
                    ));
                }
                Value::Enum(EnumValue::new(id, raw))
            }
            (ParamType::Int, NativeValue::Int(i)) => Value::Int(i),
            (ParamType::Float, NativeValue::Float(v)) => Value::Float(v),
            (ParamType::Float, NativeValue::Int(i)) => Value::Float(i as f64),
            (ParamType::Str, NativeValue::Str(s)) => Value::Str(s),
            (ParamType::Bool, NativeValue::Bool(b)) => Value::Bool(b),
            (ParamType::Void | ParamType::Any, NativeValue::None) => Value::None,
            (ParamType::Any, NativeValue::Bool(b)) => Value::Bool(b),
            (ParamType::Any, NativeValue::Int(i)) => Value::Int(i),
            (ParamType::Any, NativeValue::Float(v)) => Value::Float(v),
            (ParamType::Any, NativeValue::Str(s)) => Value::Str(s),
            (returns, other) => {
                return Err(ExcType::system_error_bad_return(
                    &self.name,
                    returns.name(registry),
                    other,
                ));
            }
        };
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{EnumDef, EnumOptions, RegistryBuilder, registry::FunctionId};

    fn registry_with(signature: Signature, result: NativeValue) -> (Registry, FunctionId) {
        let mut builder = RegistryBuilder::new();
        let scope = builder.add_scope(None, "ns").unwrap();
        builder
            .add_enum(scope, EnumDef::new("Mode", [("Off", 0), ("On", 1)]))
            .unwrap();
        let function = builder
            .add_function(scope, "f", signature, move |_| Ok(result.clone()))
            .unwrap();
        (builder.finish(), function)
    }

    fn mode(registry: &Registry) -> EnumTypeId {
        registry.find_enum("ns.Mode").unwrap()
    }

    #[test]
    fn non_member_enum_return_is_a_system_error() {
        let (registry, f) = registry_with(Signature::new([], ParamType::Enum(EnumTypeId::new(0))), NativeValue::Enum(7));
        let err = registry.call_function(f, ArgValues::Empty).unwrap_err();
        assert_eq!(err.exc_type(), ExcType::SystemError);
        assert_eq!(err.message(), Some("f() returned 7, which is not a valid ns.Mode"));
    }

    #[test]
    fn wrong_return_category_is_a_system_error() {
        let (registry, f) = registry_with(Signature::new([], ParamType::Int), NativeValue::Str("x".to_owned()));
        let err = registry.call_function(f, ArgValues::Empty).unwrap_err();
        assert_eq!(err.message(), Some(r#"f() returned str "x", expected int"#));
    }

    #[test]
    fn int_result_widens_to_float() {
        let (registry, f) = registry_with(Signature::new([], ParamType::Float), NativeValue::Int(2));
        assert_eq!(registry.call_function(f, ArgValues::Empty).unwrap(), Value::Float(2.0));
    }

    #[test]
    fn any_accepts_enums_and_scalars_but_not_containers() {
        let (registry, f) = registry_with(Signature::new([ParamType::Any], ParamType::Void), NativeValue::None);
        let on = registry.member(mode(&registry), "On").unwrap();
        assert_eq!(registry.call_function(f, Value::Enum(on).into()).unwrap(), Value::None);
        assert_eq!(registry.call_function(f, Value::Int(1).into()).unwrap(), Value::None);
        let err = registry
            .call_function(f, Value::List(vec![]).into())
            .unwrap_err();
        assert_eq!(err.exc_type(), ExcType::TypeError);
    }

    #[test]
    fn int_parameter_rejects_enum_instances() {
        let (registry, f) = registry_with(Signature::new([ParamType::Int], ParamType::Void), NativeValue::None);
        let on = registry.member(mode(&registry), "On").unwrap();
        let err = registry.call_function(f, Value::Enum(on).into()).unwrap_err();
        assert_eq!(
            err.message(),
            Some("'f' called with wrong argument types:\n  f(ns.Mode)\nSupported signatures:\n  f(int)")
        );
    }

    #[test]
    fn extensible_return_keeps_unknown_value() {
        let mut builder = RegistryBuilder::new();
        let scope = builder.add_scope(None, "ns").unwrap();
        let flags = builder
            .add_enum(
                scope,
                EnumDef::new("Flags", [("A", 1), ("B", 2)]).with_options(EnumOptions::default().extensible(true)),
            )
            .unwrap();
        let f = builder
            .add_function(scope, "both", Signature::new([], ParamType::Enum(flags)), |_| {
                Ok(NativeValue::Enum(3))
            })
            .unwrap();
        let registry = builder.finish();
        let result = registry.call_function(f, ArgValues::Empty).unwrap();
        assert_eq!(registry.repr(&result), "ns.Flags(3)");
    }
}
