//! The host-facing surface: attribute access, calls, equality and conversion.

use std::sync::Arc;

use crate::{
    args::ArgValues,
    exception::{ExcType, RunResult},
    native::NativeEnum,
    registry::{EnumTypeId, Registry},
    tracer::{BindingTracer, NoopTracer},
    value::{EnumValue, Value, float_to_int},
};

/// Projects the enums, scopes and native functions of a [`Registry`] into the host.
///
/// The registry is shared and immutable; a projection only adds the tracer, so
/// each thread can hold its own projection over one `Arc<Registry>`.
///
/// ```
/// use std::sync::Arc;
///
/// use enumbridge::{EnumDef, EnumProjection, ExcType, RegistryBuilder, Value};
///
/// let mut builder = RegistryBuilder::new();
/// let scope = builder.add_scope(None, "SampleNamespace").unwrap();
/// builder
///     .add_enum(scope, EnumDef::new("InValue", [("ZeroIn", 0), ("OneIn", 1), ("TwoIn", 2)]))
///     .unwrap();
/// let mut projection = EnumProjection::new(Arc::new(builder.finish()));
///
/// let in_value = projection.resolve("SampleNamespace.InValue").unwrap();
/// let two = projection.call(&in_value, Value::Int(2)).unwrap();
/// let expected = projection.resolve("SampleNamespace.TwoIn").unwrap();
/// assert!(projection.eq(&two, &expected));
///
/// let err = projection.call(&in_value, vec![Value::Int(13), Value::Int(14)]).unwrap_err();
/// assert!(err.matches(ExcType::TypeError));
/// ```
#[derive(Debug)]
pub struct EnumProjection<Tr: BindingTracer = NoopTracer> {
    registry: Arc<Registry>,
    tracer: Tr,
}

impl EnumProjection {
    #[must_use]
    pub fn new(registry: Arc<Registry>) -> Self {
        Self::with_tracer(registry, NoopTracer)
    }
}

impl<Tr: BindingTracer> EnumProjection<Tr> {
    pub fn with_tracer(registry: Arc<Registry>, tracer: Tr) -> Self {
        Self { registry, tracer }
    }

    #[must_use]
    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn tracer(&self) -> &Tr {
        &self.tracer
    }

    pub fn tracer_mut(&mut self) -> &mut Tr {
        &mut self.tracer
    }

    pub fn into_tracer(self) -> Tr {
        self.tracer
    }

    /// Resolves a dotted path such as `SampleNamespace.Option.None`.
    ///
    /// The first segment must name a top-level scope (`NameError` otherwise);
    /// later segments are attribute lookups (`AttributeError`).
    pub fn resolve(&mut self, path: &str) -> RunResult<Value> {
        let mut segments = path.split('.');
        let first = segments.next().unwrap_or_default();
        let mut value = self.traced(self.registry.global(first))?;
        for segment in segments {
            value = self.getattr(&value, segment)?;
        }
        Ok(value)
    }

    /// `obj.name`.
    pub fn getattr(&mut self, obj: &Value, name: &str) -> RunResult<Value> {
        let owner = self.owner_label(obj);
        self.tracer.on_getattr(&owner, name);
        let result = self.registry.getattr(obj, name);
        self.traced(result)
    }

    /// `callable(*args)`.
    ///
    /// Calling an enum type constructs an instance; calling a native function
    /// checks and marshals its arguments. Anything else is not callable.
    pub fn call(&mut self, callable: &Value, args: impl Into<ArgValues>) -> RunResult<Value> {
        let args = args.into();
        match callable {
            Value::EnumType(type_id) => self.construct(*type_id, args).map(Value::Enum),
            Value::Function(function_id) => {
                let registry = Arc::clone(&self.registry);
                let name = registry.function(*function_id).name();
                self.tracer.on_call(name, args.count());
                let result = registry.call_function(*function_id, args);
                if result.is_ok() {
                    self.tracer.on_return(name);
                }
                self.traced(result)
            }
            other => {
                let exc = ExcType::type_error_not_callable(other.type_name(&self.registry));
                self.traced(Err(exc))
            }
        }
    }

    /// `E(*args)` for a known enum type.
    pub fn construct(&mut self, type_id: EnumTypeId, args: impl Into<ArgValues>) -> RunResult<EnumValue> {
        let result = self.registry.construct(type_id, args.into());
        match result {
            Ok((kind, ev)) => {
                let enum_type = self.registry.enum_type(type_id);
                self.tracer.on_construct(enum_type.qualname(), kind, ev.value());
                Ok(ev)
            }
            Err(exc) => self.traced(Err(exc)),
        }
    }

    /// Host equality (`a == b`).
    #[must_use]
    pub fn eq(&self, a: &Value, b: &Value) -> bool {
        a.py_eq(b)
    }

    /// Host `repr(value)`.
    #[must_use]
    pub fn repr(&self, value: &Value) -> String {
        self.registry.repr(value)
    }

    /// Explicit `int(value)`; accepts enum instances as well as numbers.
    pub fn int(&mut self, value: &Value) -> RunResult<i64> {
        let result = match value {
            Value::Float(f) => float_to_int(*f),
            other => other
                .as_int()
                .ok_or_else(|| ExcType::type_error_int_conversion(other.type_name(&self.registry))),
        };
        self.traced(result)
    }

    /// Member names of an enum type value, in declaration order.
    pub fn member_names(&mut self, enum_type: &Value) -> RunResult<Vec<String>> {
        let result = match enum_type {
            Value::EnumType(type_id) => Ok(self.registry.member_names(*type_id).map(str::to_owned).collect()),
            other => Err(ExcType::type_error(format!(
                "expected an enum type, got '{}'",
                other.type_name(&self.registry)
            ))),
        };
        self.traced(result)
    }

    /// Converts a Rust enum into its host value.
    pub fn to_value<E: NativeEnum>(&mut self, value: E) -> RunResult<Value> {
        let result = match self.registry.native_type_id::<E>() {
            Some(type_id) => self
                .registry
                .enum_type(type_id)
                .instance(value.to_raw())
                .map(Value::Enum),
            None => Err(ExcType::type_error(format!("native enum '{}' is not projected", E::NAME))),
        };
        self.traced(result)
    }

    /// Converts a host value into a Rust enum, with the same strictness as a
    /// native parameter: only instances of the projected type are accepted.
    pub fn from_value<E: NativeEnum>(&mut self, value: &Value) -> RunResult<E> {
        let result = match (self.registry.native_type_id::<E>(), value) {
            (Some(type_id), Value::Enum(ev)) if ev.type_id() == type_id => {
                E::from_raw(ev.value()).ok_or_else(|| ExcType::value_error_not_member(ev.value(), E::NAME))
            }
            (Some(type_id), other) => Err(ExcType::type_error(format!(
                "expected '{}', got '{}'",
                self.registry.enum_type(type_id).qualname(),
                other.type_name(&self.registry)
            ))),
            (None, _) => Err(ExcType::type_error(format!("native enum '{}' is not projected", E::NAME))),
        };
        self.traced(result)
    }

    /// Label used for the owner in `getattr` trace events.
    fn owner_label(&self, obj: &Value) -> String {
        match obj {
            Value::Scope(id) => self.registry.scope(*id).qualname().to_owned(),
            Value::EnumType(id) => self.registry.enum_type(*id).qualname().to_owned(),
            other => self.registry.repr(other),
        }
    }

    fn traced<T>(&mut self, result: RunResult<T>) -> RunResult<T> {
        if let Err(exc) = &result {
            self.tracer.on_error(exc);
        }
        result
    }
}
