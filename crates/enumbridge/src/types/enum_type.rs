//! Projected enumeration types and their construction rules.
//!
//! An [`EnumType`] is built once at binding-load time and never mutated
//! afterwards. Construction goes through a small decision procedure:
//!
//! 1. inspect the argument count and argument type to select a constructor
//!    kind (`Default`, `FromInt`, `Copy`), rejecting surplus arity with
//!    `ArgumentCountError` and non-integers with `TypeError`;
//! 2. only then convert, rejecting integers that name no member when the type
//!    is not extensible (`ValueError`).

use ahash::AHashMap;
use indexmap::IndexMap;

use crate::{
    args::ArgValues,
    exception::{ExcType, RunResult},
    intern::StringId,
    registry::{EnumTypeId, MemberId, ScopeId},
    value::{EnumValue, Value},
};

/// How an enum instance was produced, reported to tracers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, serde::Serialize, serde::Deserialize)]
#[strum(serialize_all = "lowercase")]
pub enum ConstructorKind {
    /// `E()` - the type's designated default member.
    Default,
    /// `E(i)` - explicit coercion from an integer.
    FromInt,
    /// `E(e)` where `e` is already an instance of `E`.
    Copy,
}

/// Selected constructor, carrying the payload it will convert.
#[derive(Debug, Clone, Copy)]
enum Constructor {
    Default,
    FromInt(i64),
    Copy(EnumValue),
}

/// Declaration of an enum registered through [`RegistryBuilder::add_enum`](crate::RegistryBuilder::add_enum).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDef {
    pub name: String,
    /// Members in declaration order. Values may repeat (aliases) and need not be contiguous.
    pub members: Vec<(String, i64)>,
    pub options: EnumOptions,
}

impl EnumDef {
    pub fn new<N: Into<String>>(name: impl Into<String>, members: impl IntoIterator<Item = (N, i64)>) -> Self {
        Self {
            name: name.into(),
            members: members.into_iter().map(|(n, v)| (n.into(), v)).collect(),
            options: EnumOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: EnumOptions) -> Self {
        self.options = options;
        self
    }
}

/// Registration flags shared by declared and native enums.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnumOptions {
    /// Member returned by `E()`.
    ///
    /// When unset the first member whose value is zero is used, falling back to
    /// the first declared member.
    pub default: Option<String>,
    /// Accept integers that match no member.
    pub extensible: bool,
    /// `enum class` semantics: members are not hoisted into the enclosing scope.
    pub scoped: bool,
}

impl EnumOptions {
    #[must_use]
    pub fn default_member(mut self, name: impl Into<String>) -> Self {
        self.default = Some(name.into());
        self
    }

    #[must_use]
    pub fn extensible(mut self, extensible: bool) -> Self {
        self.extensible = extensible;
        self
    }

    #[must_use]
    pub fn scoped(mut self, scoped: bool) -> Self {
        self.scoped = scoped;
        self
    }
}

/// A projected enumeration type.
#[derive(Debug)]
pub struct EnumType {
    pub(crate) id: EnumTypeId,
    pub(crate) name: StringId,
    qualname: String,
    scope: ScopeId,
    /// Member name -> canonical member id, in declaration order.
    pub(crate) members: IndexMap<StringId, MemberId>,
    /// Value -> first member declared with that value.
    by_value: AHashMap<i64, MemberId>,
    default_member: MemberId,
    default_value: i64,
    extensible: bool,
    scoped: bool,
}

impl EnumType {
    #[expect(clippy::too_many_arguments, reason = "built once by the registry builder")]
    pub(crate) fn new(
        id: EnumTypeId,
        name: StringId,
        qualname: String,
        scope: ScopeId,
        members: IndexMap<StringId, MemberId>,
        by_value: AHashMap<i64, MemberId>,
        (default_member, default_value): (MemberId, i64),
        options: &EnumOptions,
    ) -> Self {
        Self {
            id,
            name,
            qualname,
            scope,
            members,
            by_value,
            default_member,
            default_value,
            extensible: options.extensible,
            scoped: options.scoped,
        }
    }

    #[must_use]
    pub fn id(&self) -> EnumTypeId {
        self.id
    }

    /// Dotted name including enclosing scopes, e.g. `SampleNamespace.Option`.
    #[must_use]
    pub fn qualname(&self) -> &str {
        &self.qualname
    }

    /// The scope this enum was declared in.
    #[must_use]
    pub fn scope(&self) -> ScopeId {
        self.scope
    }

    #[must_use]
    pub fn is_extensible(&self) -> bool {
        self.extensible
    }

    #[must_use]
    pub fn is_scoped(&self) -> bool {
        self.scoped
    }

    /// Number of declared members, aliases included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The instance produced by `E()`.
    #[must_use]
    pub fn default_value(&self) -> EnumValue {
        EnumValue::new(self.id, self.default_value)
    }

    /// The member named as default, which may be an alias of an earlier member.
    pub(crate) fn default_member(&self) -> MemberId {
        self.default_member
    }

    /// Returns the first member declared with `value`, if any.
    pub(crate) fn member_for_value(&self, value: i64) -> Option<MemberId> {
        self.by_value.get(&value).copied()
    }

    /// Whether `value` may be carried by an instance of this type.
    #[must_use]
    pub fn accepts(&self, value: i64) -> bool {
        self.extensible || self.by_value.contains_key(&value)
    }

    /// Builds an instance from a raw payload, applying the extensibility rule.
    pub(crate) fn instance(&self, value: i64) -> RunResult<EnumValue> {
        if self.accepts(value) {
            Ok(EnumValue::new(self.id, value))
        } else {
            Err(ExcType::value_error_not_member(value, &self.qualname))
        }
    }

    /// Runs the construction decision procedure for `E(*args)`.
    pub(crate) fn construct(&self, args: ArgValues) -> RunResult<(ConstructorKind, EnumValue)> {
        match self.select_constructor(args)? {
            Constructor::Default => Ok((ConstructorKind::Default, self.default_value())),
            Constructor::FromInt(value) => Ok((ConstructorKind::FromInt, self.instance(value)?)),
            Constructor::Copy(ev) => Ok((ConstructorKind::Copy, ev)),
        }
    }

    /// Picks the constructor by inspecting arity and argument type, before any conversion.
    fn select_constructor(&self, args: ArgValues) -> RunResult<Constructor> {
        let Some(arg) = args.get_zero_one_arg(&self.qualname)? else {
            return Ok(Constructor::Default);
        };
        match arg {
            Value::Int(i) => Ok(Constructor::FromInt(i)),
            Value::Bool(b) => Ok(Constructor::FromInt(i64::from(b))),
            Value::Enum(ev) if ev.type_id() == self.id => Ok(Constructor::Copy(ev)),
            Value::Enum(_) => Err(ExcType::type_error(format!(
                "{}() argument must be an integer or a {} instance, not another enum",
                self.qualname, self.qualname
            ))),
            Value::None => Err(ExcType::type_error_enum_init(&self.qualname, "NoneType")),
            Value::Float(_) => Err(ExcType::type_error_enum_init(&self.qualname, "float")),
            Value::Str(_) => Err(ExcType::type_error_enum_init(&self.qualname, "str")),
            Value::List(_) => Err(ExcType::type_error_enum_init(&self.qualname, "list")),
            Value::Dict(_) => Err(ExcType::type_error_enum_init(&self.qualname, "dict")),
            Value::EnumType(_) => Err(ExcType::type_error_enum_init(&self.qualname, "type")),
            Value::Scope(_) => Err(ExcType::type_error_enum_init(&self.qualname, "namespace")),
            Value::Function(_) => Err(ExcType::type_error_enum_init(
                &self.qualname,
                "builtin_function_or_method",
            )),
        }
    }
}
