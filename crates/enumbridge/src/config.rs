//! JSON binding descriptions.
//!
//! Scopes and enums can be declared in a JSON document instead of in code:
//!
//! ```json
//! { "scopes": [ { "name": "SampleNamespace",
//!     "enums": [ { "name": "Option", "members": {"None": 0, "RandomNumber": 1, "UnixTime": 2} } ] } ] }
//! ```
//!
//! Loading yields a [`RegistryBuilder`] rather than a finished registry, so
//! native functions can still be attached before [`RegistryBuilder::finish`].

use std::{fmt, fs, io, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    registry::{DefinitionError, Registry, RegistryBuilder, ScopeId},
    types::{EnumDef, EnumOptions},
};

/// Root of a binding description.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BindingSpec {
    #[serde(default)]
    pub scopes: Vec<ScopeSpec>,
}

/// A scope and everything declared in it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScopeSpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub enums: Vec<EnumSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<ScopeSpec>,
}

/// One enum declaration.
///
/// `members` is a JSON object read in document order. Repeated keys are kept
/// so the builder can reject them as duplicate members.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnumSpec {
    pub name: String,
    #[serde(with = "member_map")]
    pub members: Vec<(String, i64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub extensible: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub scoped: bool,
}

/// `(name, value)` pairs as a JSON object, without collapsing repeated names.
mod member_map {
    use std::fmt;

    use serde::{
        Deserializer, Serializer,
        de::{MapAccess, Visitor},
        ser::SerializeMap,
    };

    pub fn serialize<S: Serializer>(members: &[(String, i64)], serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(members.len()))?;
        for (name, value) in members {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<(String, i64)>, D::Error> {
        deserializer.deserialize_map(MemberMapVisitor)
    }

    struct MemberMapVisitor;

    impl<'de> Visitor<'de> for MemberMapVisitor {
        type Value = Vec<(String, i64)>;

        fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
            formatter.write_str("a map of member names to integer values")
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut members = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some(entry) = map.next_entry::<String, i64>()? {
                members.push(entry);
            }
            Ok(members)
        }
    }
}

#[expect(clippy::trivially_copy_pass_by_ref, reason = "serde skip_serializing_if passes by reference")]
fn is_false(value: &bool) -> bool {
    !*value
}

impl EnumSpec {
    fn to_def(&self) -> EnumDef {
        let mut options = EnumOptions::default()
            .extensible(self.extensible)
            .scoped(self.scoped);
        options.default.clone_from(&self.default);
        EnumDef::new(self.name.as_str(), self.members.iter().cloned()).with_options(options)
    }
}

impl BindingSpec {
    /// Declares every scope and enum of this description in `builder`.
    pub fn apply(&self, builder: &mut RegistryBuilder) -> Result<(), DefinitionError> {
        for scope in &self.scopes {
            scope.apply(builder, None)?;
        }
        Ok(())
    }

    /// Pretty-printed JSON, in the same shape [`load_str`] accepts.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl ScopeSpec {
    fn apply(&self, builder: &mut RegistryBuilder, parent: Option<ScopeId>) -> Result<(), DefinitionError> {
        let scope_id = builder.add_scope(parent, &self.name)?;
        for enum_spec in &self.enums {
            builder.add_enum(scope_id, enum_spec.to_def())?;
        }
        for child in &self.scopes {
            child.apply(builder, Some(scope_id))?;
        }
        Ok(())
    }
}

/// Error returned by [`load_str`] and [`load_file`].
#[derive(Debug)]
pub enum LoadError {
    Io { path: String, err: io::Error },
    Parse(serde_json::Error),
    Definition(DefinitionError),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, err } => write!(f, "reading {path}: {err}"),
            Self::Parse(err) => write!(f, "invalid binding description: {err}"),
            Self::Definition(err) => write!(f, "invalid binding: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { err, .. } => Some(err),
            Self::Parse(err) => Some(err),
            Self::Definition(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

impl From<DefinitionError> for LoadError {
    fn from(err: DefinitionError) -> Self {
        Self::Definition(err)
    }
}

/// Parses a binding description and declares it in a fresh builder.
pub fn load_str(json: &str) -> Result<RegistryBuilder, LoadError> {
    let spec: BindingSpec = serde_json::from_str(json)?;
    let mut builder = RegistryBuilder::new();
    spec.apply(&mut builder)?;
    Ok(builder)
}

/// Reads and loads a binding description from disk.
pub fn load_file(path: impl AsRef<Path>) -> Result<RegistryBuilder, LoadError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|err| LoadError::Io {
        path: path.display().to_string(),
        err,
    })?;
    load_str(&json)
}

impl Registry {
    /// Describes the declared scopes and enums; native functions are not included.
    ///
    /// The description always names each enum's default member explicitly.
    #[must_use]
    pub fn describe(&self) -> BindingSpec {
        BindingSpec {
            scopes: self.root_scopes().map(|id| self.describe_scope(id)).collect(),
        }
    }

    fn describe_scope(&self, scope_id: ScopeId) -> ScopeSpec {
        let scope = self.scope(scope_id);
        ScopeSpec {
            name: self.scope_name(scope_id).to_owned(),
            enums: scope
                .enum_types()
                .map(|type_id| {
                    let enum_type = self.enum_type(type_id);
                    EnumSpec {
                        name: self.enum_name(type_id).to_owned(),
                        members: self
                            .members(type_id)
                            .map(|(name, value)| (name.to_owned(), value))
                            .collect(),
                        default: Some(self.default_member_name(type_id).to_owned()),
                        extensible: enum_type.is_extensible(),
                        scoped: enum_type.is_scoped(),
                    }
                })
                .collect(),
            scopes: scope.child_scopes().map(|id| self.describe_scope(id)).collect(),
        }
    }
}
