//! Process-wide binding tables.
//!
//! A [`RegistryBuilder`] collects scopes, enum types, members and native
//! functions at binding-load time. [`RegistryBuilder::finish`] freezes them into
//! a [`Registry`], which is never mutated again and can be shared between
//! threads behind an `Arc`.
//!
//! # Canonical member table
//!
//! Every member is stored exactly once in `Registry::members` and referred to
//! by [`MemberId`]. The enum type's member map and (for unscoped enums) the
//! enclosing scope's attribute map both hold the same id, so `E.m` and `S.m`
//! are the same logical value by construction rather than two copies that
//! happen to agree.

use std::{any::TypeId, fmt};

use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;

use crate::{
    args::ArgValues,
    exception::{ExcType, RunResult},
    intern::{Interns, StringId},
    native::NativeEnum,
    types::{
        ConstructorKind, EnumDef, EnumOptions, EnumType, NativeArgs, NativeFunction, NativeValue, ParamType, Scope,
        Signature,
        scope::Attr,
    },
    value::{EnumValue, Value},
};

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        pub struct $name(u32);

        impl $name {
            pub(crate) fn new(index: usize) -> Self {
                Self(index.try_into().expect(concat!("Invalid ", stringify!($name))))
            }

            /// Returns the raw index value.
            #[inline]
            #[must_use]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }
    };
}

define_id!(
    /// Index of a scope in the registry.
    ScopeId
);
define_id!(
    /// Index of an enum type in the registry.
    EnumTypeId
);
define_id!(
    /// Index into the canonical member table.
    MemberId
);
define_id!(
    /// Index of a native function in the registry.
    FunctionId
);

/// One entry of the canonical member table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Member {
    pub type_id: EnumTypeId,
    pub name: StringId,
    pub value: i64,
}

impl Member {
    pub fn instance(self) -> EnumValue {
        EnumValue::new(self.type_id, self.value)
    }
}

/// Error raised while declaring bindings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionError {
    /// An enum was declared without members, so it has no default.
    EmptyEnum { enum_name: String },
    /// Two members of one enum share a name.
    DuplicateMember { enum_name: String, member: String },
    /// The requested default is not a member.
    UnknownDefault { enum_name: String, default: String },
    /// A scope already binds this name (including names hoisted from unscoped enums).
    DuplicateAttr { scope: String, attr: String },
    /// A typed function referenced a Rust enum that was never registered.
    UnknownNativeEnum { type_name: &'static str },
    /// The same Rust enum was registered twice.
    DuplicateNativeEnum { type_name: &'static str },
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEnum { enum_name } => write!(f, "enum '{enum_name}' has no members"),
            Self::DuplicateMember { enum_name, member } => {
                write!(f, "enum '{enum_name}' declares member '{member}' more than once")
            }
            Self::UnknownDefault { enum_name, default } => {
                write!(f, "default '{default}' is not a member of enum '{enum_name}'")
            }
            Self::DuplicateAttr { scope, attr } => write!(f, "'{scope}' already defines '{attr}'"),
            Self::UnknownNativeEnum { type_name } => {
                write!(f, "native enum '{type_name}' is used before it is registered")
            }
            Self::DuplicateNativeEnum { type_name } => {
                write!(f, "native enum '{type_name}' is registered more than once")
            }
        }
    }
}

impl std::error::Error for DefinitionError {}

/// Immutable binding tables shared by every projection.
#[derive(Debug, Default)]
pub struct Registry {
    pub(crate) interns: Interns,
    scopes: Vec<Scope>,
    enum_types: Vec<EnumType>,
    members: Vec<Member>,
    functions: Vec<NativeFunction>,
    /// Top-level scopes by name, in declaration order.
    roots: IndexMap<StringId, ScopeId>,
    /// Rust enums projected with `add_native_enum`.
    native_types: AHashMap<TypeId, EnumTypeId>,
}

impl Registry {
    /// # Panics
    /// Panics if `id` belongs to a different registry.
    #[must_use]
    pub fn enum_type(&self, id: EnumTypeId) -> &EnumType {
        &self.enum_types[id.index()]
    }

    /// # Panics
    /// Panics if `id` belongs to a different registry.
    #[must_use]
    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.index()]
    }

    /// # Panics
    /// Panics if `id` belongs to a different registry.
    #[must_use]
    pub fn function(&self, id: FunctionId) -> &NativeFunction {
        &self.functions[id.index()]
    }

    /// Top-level scopes in declaration order.
    pub fn root_scopes(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.roots.values().copied()
    }

    #[must_use]
    pub fn scope_name(&self, id: ScopeId) -> &str {
        self.interns.get_str(self.scope(id).name)
    }

    #[must_use]
    pub fn enum_name(&self, id: EnumTypeId) -> &str {
        self.interns.get_str(self.enum_type(id).name)
    }

    /// Member names of an enum in declaration order, aliases included.
    pub fn member_names(&self, id: EnumTypeId) -> impl Iterator<Item = &str> + '_ {
        self.enum_type(id).members.keys().map(|name| self.interns.get_str(*name))
    }

    /// `(name, value)` pairs of an enum in declaration order.
    pub fn members(&self, id: EnumTypeId) -> impl Iterator<Item = (&str, i64)> + '_ {
        self.enum_type(id).members.values().map(|member_id| {
            let member = self.members[member_id.index()];
            (self.interns.get_str(member.name), member.value)
        })
    }

    /// Looks up a member of `id` by name.
    #[must_use]
    pub fn member(&self, id: EnumTypeId, name: &str) -> Option<EnumValue> {
        let name = self.interns.lookup(name)?;
        let member_id = self.enum_type(id).members.get(&name)?;
        Some(self.members[member_id.index()].instance())
    }

    /// Name of the first member declared with this value; `None` for value-only instances.
    #[must_use]
    pub fn member_name(&self, value: EnumValue) -> Option<&str> {
        let member_id = self.enum_type(value.type_id()).member_for_value(value.value())?;
        Some(self.interns.get_str(self.members[member_id.index()].name))
    }

    /// Name of the member `E()` returns, as declared; an aliased default keeps its own name.
    #[must_use]
    pub fn default_member_name(&self, id: EnumTypeId) -> &str {
        let member_id = self.enum_type(id).default_member();
        self.interns.get_str(self.members[member_id.index()].name)
    }

    /// Registry id of a projected Rust enum.
    #[must_use]
    pub fn native_type_id<E: NativeEnum>(&self) -> Option<EnumTypeId> {
        self.native_types.get(&TypeId::of::<E>()).copied()
    }

    /// Finds a scope by dotted path, e.g. `sample.SampleNamespace`.
    #[must_use]
    pub fn find_scope(&self, path: &str) -> Option<ScopeId> {
        let mut segments = path.split('.');
        let first = self.interns.lookup(segments.next()?)?;
        let mut scope_id = *self.roots.get(&first)?;
        for segment in segments {
            let name = self.interns.lookup(segment)?;
            match self.scope(scope_id).get(name)? {
                Attr::Scope(child) => scope_id = child,
                _ => return None,
            }
        }
        Some(scope_id)
    }

    /// Finds an enum type by dotted path, e.g. `SampleNamespace.Option`.
    #[must_use]
    pub fn find_enum(&self, path: &str) -> Option<EnumTypeId> {
        let (scope_path, name) = path.rsplit_once('.')?;
        let scope_id = self.find_scope(scope_path)?;
        match self.scope(scope_id).get(self.interns.lookup(name)?)? {
            Attr::EnumType(id) => Some(id),
            _ => None,
        }
    }

    fn attr_value(&self, attr: Attr) -> Value {
        match attr {
            Attr::Scope(id) => Value::Scope(id),
            Attr::EnumType(id) => Value::EnumType(id),
            Attr::Member(id) => Value::Enum(self.members[id.index()].instance()),
            Attr::Function(id) => Value::Function(id),
        }
    }

    /// Looks up a top-level name.
    pub(crate) fn global(&self, name: &str) -> RunResult<Value> {
        self.interns
            .lookup(name)
            .and_then(|id| self.roots.get(&id))
            .map(|scope_id| Value::Scope(*scope_id))
            .ok_or_else(|| ExcType::name_error(name))
    }

    /// Attribute lookup: `obj.name`.
    pub(crate) fn getattr(&self, obj: &Value, name: &str) -> RunResult<Value> {
        match obj {
            Value::Scope(scope_id) => {
                let scope = self.scope(*scope_id);
                self.interns
                    .lookup(name)
                    .and_then(|id| scope.get(id))
                    .map(|attr| self.attr_value(attr))
                    .ok_or_else(|| ExcType::attribute_error_on("namespace", scope.qualname(), name))
            }
            Value::EnumType(type_id) => self.enum_type_attr(*type_id, name),
            Value::Enum(ev) => match name {
                "name" => Ok(self.member_name(*ev).map_or(Value::None, Value::from)),
                "value" => Ok(Value::Int(ev.value())),
                _ => Err(ExcType::attribute_error(obj.type_name(self), name)),
            },
            Value::Function(function_id) if name == "__name__" => Ok(Value::from(self.function(*function_id).name())),
            _ => Err(ExcType::attribute_error(obj.type_name(self), name)),
        }
    }

    /// Attributes of an enum type: its members first, then `values`, `__name__` and `__qualname__`.
    fn enum_type_attr(&self, type_id: EnumTypeId, name: &str) -> RunResult<Value> {
        let enum_type = self.enum_type(type_id);
        if let Some(member_id) = self.interns.lookup(name).and_then(|id| enum_type.members.get(&id)) {
            return Ok(Value::Enum(self.members[member_id.index()].instance()));
        }
        match name {
            "values" => Ok(Value::Dict(
                enum_type
                    .members
                    .iter()
                    .map(|(name, member_id)| {
                        (
                            self.interns.get_str(*name).to_owned(),
                            Value::Enum(self.members[member_id.index()].instance()),
                        )
                    })
                    .collect(),
            )),
            "__name__" => Ok(Value::from(self.interns.get_str(enum_type.name))),
            "__qualname__" => Ok(Value::from(enum_type.qualname())),
            _ => Err(ExcType::attribute_error_on("enum", enum_type.qualname(), name)),
        }
    }

    /// `E(*args)`.
    pub(crate) fn construct(&self, type_id: EnumTypeId, args: ArgValues) -> RunResult<(ConstructorKind, EnumValue)> {
        self.enum_type(type_id).construct(args)
    }

    /// `f(*args)` for a native function.
    pub(crate) fn call_function(&self, function_id: FunctionId, args: ArgValues) -> RunResult<Value> {
        self.function(function_id).invoke(args, self)
    }

    /// Host `repr(value)`.
    #[must_use]
    pub fn repr(&self, value: &Value) -> String {
        let mut out = String::new();
        // writing into a String cannot fail
        let _ = value.repr_fmt(&mut out, self);
        out
    }
}

/// Collects binding declarations, then freezes them into a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    registry: Registry,
}

impl RegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a scope, nested in `parent` or at the top level.
    pub fn add_scope(&mut self, parent: Option<ScopeId>, name: &str) -> Result<ScopeId, DefinitionError> {
        let name_id = self.registry.interns.intern(name);
        let scope_id = ScopeId::new(self.registry.scopes.len());
        let qualname = match parent {
            Some(parent_id) => {
                let parent_scope = &mut self.registry.scopes[parent_id.index()];
                if !parent_scope.insert(name_id, Attr::Scope(scope_id)) {
                    return Err(DefinitionError::DuplicateAttr {
                        scope: parent_scope.qualname().to_owned(),
                        attr: name.to_owned(),
                    });
                }
                format!("{}.{name}", parent_scope.qualname())
            }
            None => {
                if self.registry.roots.contains_key(&name_id) {
                    return Err(DefinitionError::DuplicateAttr {
                        scope: "<root>".to_owned(),
                        attr: name.to_owned(),
                    });
                }
                self.registry.roots.insert(name_id, scope_id);
                name.to_owned()
            }
        };
        self.registry.scopes.push(Scope::new(name_id, qualname, parent));
        Ok(scope_id)
    }

    /// Declares an enum in `scope`.
    ///
    /// Unless the enum is scoped, each member is also bound in `scope`. All
    /// validation happens before anything is bound, so a failed declaration
    /// leaves the builder unchanged apart from interned names.
    pub fn add_enum(&mut self, scope: ScopeId, def: EnumDef) -> Result<EnumTypeId, DefinitionError> {
        let EnumDef { name, members, options } = def;
        let default_index = Self::validate_enum(&name, &members, &options)?;

        let name_id = self.registry.interns.intern(&name);
        let member_name_ids: Vec<StringId> = members
            .iter()
            .map(|(member, _)| self.registry.interns.intern(member))
            .collect();

        let scope_ref = &self.registry.scopes[scope.index()];
        let collision = std::iter::once((name_id, name.as_str()))
            .chain(
                member_name_ids
                    .iter()
                    .zip(&members)
                    .filter(|_| !options.scoped)
                    .map(|(id, (member, _))| (*id, member.as_str())),
            )
            .find(|(id, _)| scope_ref.contains(*id));
        if let Some((_, attr)) = collision {
            return Err(DefinitionError::DuplicateAttr {
                scope: scope_ref.qualname().to_owned(),
                attr: attr.to_owned(),
            });
        }
        if !options.scoped && member_name_ids.contains(&name_id) {
            return Err(DefinitionError::DuplicateAttr {
                scope: scope_ref.qualname().to_owned(),
                attr: name,
            });
        }

        let type_id = EnumTypeId::new(self.registry.enum_types.len());
        let qualname = format!("{}.{name}", scope_ref.qualname());
        let mut member_map = IndexMap::with_capacity(members.len());
        let mut by_value = AHashMap::with_capacity(members.len());
        for (name_id, (_, value)) in member_name_ids.iter().zip(&members) {
            let member_id = MemberId::new(self.registry.members.len());
            self.registry.members.push(Member {
                type_id,
                name: *name_id,
                value: *value,
            });
            member_map.insert(*name_id, member_id);
            by_value.entry(*value).or_insert(member_id);
        }

        let scope_mut = &mut self.registry.scopes[scope.index()];
        scope_mut.insert(name_id, Attr::EnumType(type_id));
        if !options.scoped {
            for (name_id, member_id) in &member_map {
                scope_mut.insert(*name_id, Attr::Member(*member_id));
            }
        }

        let default_member = member_map[default_index];
        self.registry.enum_types.push(EnumType::new(
            type_id,
            name_id,
            qualname,
            scope,
            member_map,
            by_value,
            (default_member, members[default_index].1),
            &options,
        ));
        Ok(type_id)
    }

    /// Checks member uniqueness and resolves the default member, returning its index.
    fn validate_enum(name: &str, members: &[(String, i64)], options: &EnumOptions) -> Result<usize, DefinitionError> {
        if members.is_empty() {
            return Err(DefinitionError::EmptyEnum {
                enum_name: name.to_owned(),
            });
        }
        let mut seen = AHashSet::with_capacity(members.len());
        for (member, _) in members {
            if !seen.insert(member.as_str()) {
                return Err(DefinitionError::DuplicateMember {
                    enum_name: name.to_owned(),
                    member: member.clone(),
                });
            }
        }
        match &options.default {
            Some(default) => members
                .iter()
                .position(|(member, _)| member == default)
                .ok_or_else(|| DefinitionError::UnknownDefault {
                    enum_name: name.to_owned(),
                    default: default.clone(),
                }),
            None => Ok(members.iter().position(|(_, value)| *value == 0).unwrap_or(0)),
        }
    }

    /// Projects a Rust enum declared with [`native_enum!`](crate::native_enum).
    pub fn add_native_enum<E: NativeEnum>(
        &mut self,
        scope: ScopeId,
        options: EnumOptions,
    ) -> Result<EnumTypeId, DefinitionError> {
        let type_key = TypeId::of::<E>();
        if self.registry.native_types.contains_key(&type_key) {
            return Err(DefinitionError::DuplicateNativeEnum { type_name: E::NAME });
        }
        let def = EnumDef::new(E::NAME, E::MEMBERS.iter().copied()).with_options(options);
        let type_id = self.add_enum(scope, def)?;
        self.registry.native_types.insert(type_key, type_id);
        Ok(type_id)
    }

    /// Registry id of a previously projected Rust enum.
    pub fn native_type_id<E: NativeEnum>(&self) -> Result<EnumTypeId, DefinitionError> {
        self.registry
            .native_type_id::<E>()
            .ok_or(DefinitionError::UnknownNativeEnum { type_name: E::NAME })
    }

    /// Binds a native function in `scope`.
    pub fn add_function<F>(
        &mut self,
        scope: ScopeId,
        name: &str,
        signature: Signature,
        body: F,
    ) -> Result<FunctionId, DefinitionError>
    where
        F: Fn(&NativeArgs<'_>) -> RunResult<NativeValue> + Send + Sync + 'static,
    {
        let name_id = self.registry.interns.intern(name);
        let function_id = FunctionId::new(self.registry.functions.len());
        let scope_mut = &mut self.registry.scopes[scope.index()];
        if !scope_mut.insert(name_id, Attr::Function(function_id)) {
            return Err(DefinitionError::DuplicateAttr {
                scope: scope_mut.qualname().to_owned(),
                attr: name.to_owned(),
            });
        }
        self.registry
            .functions
            .push(NativeFunction::new(name.to_owned(), signature, Box::new(body)));
        Ok(function_id)
    }

    /// Binds a typed `A -> B` enum conversion function.
    ///
    /// Both enums must have been projected with [`add_native_enum`](Self::add_native_enum).
    pub fn add_enum_fn<A, B, F>(&mut self, scope: ScopeId, name: &str, f: F) -> Result<FunctionId, DefinitionError>
    where
        A: NativeEnum,
        B: NativeEnum,
        F: Fn(A) -> B + Send + Sync + 'static,
    {
        let signature = Signature::new(
            [ParamType::Enum(self.native_type_id::<A>()?)],
            ParamType::Enum(self.native_type_id::<B>()?),
        );
        self.add_function(scope, name, signature, move |args| {
            let input = args.get_enum::<A>(0)?;
            Ok(NativeValue::from_enum(f(input)))
        })
    }

    /// Scope lookup while building, so config-loaded bindings can be extended.
    #[must_use]
    pub fn find_scope(&self, path: &str) -> Option<ScopeId> {
        self.registry.find_scope(path)
    }

    #[must_use]
    pub fn find_enum(&self, path: &str) -> Option<EnumTypeId> {
        self.registry.find_enum(path)
    }

    /// Freezes the tables.
    #[must_use]
    pub fn finish(self) -> Registry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> (Registry, ScopeId, EnumTypeId) {
        let mut builder = RegistryBuilder::new();
        let scope = builder.add_scope(None, "SampleNamespace").unwrap();
        let option = builder
            .add_enum(
                scope,
                EnumDef::new("Option", [("None", 0), ("RandomNumber", 1), ("UnixTime", 2)]),
            )
            .unwrap();
        (builder.finish(), scope, option)
    }

    #[test]
    fn member_is_stored_once_and_shared() {
        let (registry, scope, option) = sample();
        assert_eq!(registry.members.len(), 3);
        let name = registry.interns.lookup("UnixTime").unwrap();
        let Some(Attr::Member(from_scope)) = registry.scope(scope).get(name) else {
            panic!("UnixTime should be hoisted into the scope");
        };
        assert_eq!(registry.enum_type(option).members.get(&name), Some(&from_scope));
    }

    #[test]
    fn default_prefers_zero_valued_member() {
        let mut builder = RegistryBuilder::new();
        let scope = builder.add_scope(None, "ns").unwrap();
        let id = builder
            .add_enum(scope, EnumDef::new("Level", [("Low", 3), ("Off", 0), ("High", 9)]))
            .unwrap();
        let no_zero = builder
            .add_enum(scope, EnumDef::new("Sparse", [("A", 4), ("B", 8)]))
            .unwrap();
        let registry = builder.finish();
        assert_eq!(registry.enum_type(id).default_value().value(), 0);
        assert_eq!(registry.enum_type(no_zero).default_value().value(), 4);
    }

    #[test]
    fn explicit_alias_default_keeps_its_name() {
        let mut builder = RegistryBuilder::new();
        let scope = builder.add_scope(None, "ns").unwrap();
        let id = builder
            .add_enum(
                scope,
                EnumDef::new("Mode", [("Fast", 1), ("Quick", 1)]).with_options(EnumOptions::default().default_member("Quick")),
            )
            .unwrap();
        let level = builder
            .add_enum(scope, EnumDef::new("Level", [("Low", 3), ("Off", 0)]))
            .unwrap();
        let registry = builder.finish();
        assert_eq!(registry.default_member_name(id), "Quick");
        assert_eq!(registry.member_name(registry.enum_type(id).default_value()), Some("Fast"));
        assert_eq!(registry.default_member_name(level), "Off");
    }

    #[test]
    fn explicit_default_must_be_a_member() {
        let mut builder = RegistryBuilder::new();
        let scope = builder.add_scope(None, "ns").unwrap();
        let err = builder
            .add_enum(
                scope,
                EnumDef::new("Option", [("None", 0)]).with_options(EnumOptions::default().default_member("Unset")),
            )
            .unwrap_err();
        assert_eq!(
            err,
            DefinitionError::UnknownDefault {
                enum_name: "Option".to_owned(),
                default: "Unset".to_owned(),
            }
        );
    }

    #[test]
    fn hoisting_collision_is_rejected_without_side_effects() {
        let mut builder = RegistryBuilder::new();
        let scope = builder.add_scope(None, "SampleNamespace").unwrap();
        builder
            .add_enum(scope, EnumDef::new("InValue", [("ZeroIn", 0), ("TwoIn", 2)]))
            .unwrap();
        let err = builder
            .add_enum(scope, EnumDef::new("Other", [("Fresh", 0), ("TwoIn", 2)]))
            .unwrap_err();
        assert_eq!(err.to_string(), "'SampleNamespace' already defines 'TwoIn'");
        let registry = builder.finish();
        assert!(registry.find_enum("SampleNamespace.Other").is_none());
        assert_eq!(registry.members.len(), 2);
    }

    #[test]
    fn scoped_enums_may_reuse_member_names() {
        let mut builder = RegistryBuilder::new();
        let scope = builder.add_scope(None, "ns").unwrap();
        builder
            .add_enum(scope, EnumDef::new("Color", [("Red", 0), ("Green", 1)]))
            .unwrap();
        let light = builder
            .add_enum(
                scope,
                EnumDef::new("Light", [("Red", 0), ("Amber", 1)]).with_options(EnumOptions::default().scoped(true)),
            )
            .unwrap();
        let registry = builder.finish();
        assert!(registry.enum_type(light).is_scoped());
        assert_eq!(registry.member_names(light).collect::<Vec<_>>(), vec!["Red", "Amber"]);
    }

    #[test]
    fn duplicate_member_and_empty_enum_are_rejected() {
        let mut builder = RegistryBuilder::new();
        let scope = builder.add_scope(None, "ns").unwrap();
        assert!(matches!(
            builder.add_enum(scope, EnumDef::new("Twice", [("A", 0), ("A", 1)])),
            Err(DefinitionError::DuplicateMember { .. })
        ));
        assert!(matches!(
            builder.add_enum(scope, EnumDef::new("Empty", Vec::<(String, i64)>::new())),
            Err(DefinitionError::EmptyEnum { .. })
        ));
    }

    #[test]
    fn nested_scopes_resolve_by_path() {
        let mut builder = RegistryBuilder::new();
        let outer = builder.add_scope(None, "sample").unwrap();
        let inner = builder.add_scope(Some(outer), "SampleNamespace").unwrap();
        let option = builder
            .add_enum(inner, EnumDef::new("Option", [("None", 0)]))
            .unwrap();
        assert!(builder.add_scope(Some(outer), "SampleNamespace").is_err());
        let registry = builder.finish();
        assert_eq!(registry.find_scope("sample.SampleNamespace"), Some(inner));
        assert_eq!(registry.find_enum("sample.SampleNamespace.Option"), Some(option));
        assert_eq!(registry.enum_type(option).qualname(), "sample.SampleNamespace.Option");
        assert_eq!(registry.scope(inner).parent(), Some(outer));
    }

    #[test]
    fn aliases_share_a_value_and_report_the_first_name() {
        let mut builder = RegistryBuilder::new();
        let scope = builder.add_scope(None, "ns").unwrap();
        let id = builder
            .add_enum(scope, EnumDef::new("Mode", [("Fast", 1), ("Quick", 1), ("Slow", 2)]))
            .unwrap();
        let registry = builder.finish();
        let quick = registry.member(id, "Quick").unwrap();
        assert_eq!(quick, registry.member(id, "Fast").unwrap());
        assert_eq!(registry.member_name(quick), Some("Fast"));
        assert_eq!(
            registry.members(id).collect::<Vec<_>>(),
            vec![("Fast", 1), ("Quick", 1), ("Slow", 2)]
        );
    }
}
