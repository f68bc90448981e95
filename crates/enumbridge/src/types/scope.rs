use indexmap::{IndexMap, map::Entry};

use crate::{
    intern::StringId,
    registry::{EnumTypeId, FunctionId, MemberId, ScopeId},
};

/// What a scope attribute refers to.
///
/// Members are stored as ids into the registry's canonical member table, so an
/// unscoped member hoisted into its scope and the same member reached through
/// its enum type resolve to one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Attr {
    Scope(ScopeId),
    EnumType(EnumTypeId),
    Member(MemberId),
    Function(FunctionId),
}

/// A namespace object (module, C++ namespace, or class) in the host.
#[derive(Debug)]
pub struct Scope {
    pub(crate) name: StringId,
    qualname: String,
    parent: Option<ScopeId>,
    pub(crate) attrs: IndexMap<StringId, Attr>,
}

impl Scope {
    pub(crate) fn new(name: StringId, qualname: String, parent: Option<ScopeId>) -> Self {
        Self {
            name,
            qualname,
            parent,
            attrs: IndexMap::new(),
        }
    }

    /// Dotted path from the outermost scope, e.g. `sample.SampleNamespace`.
    #[must_use]
    pub fn qualname(&self) -> &str {
        &self.qualname
    }

    #[must_use]
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub(crate) fn get(&self, name: StringId) -> Option<Attr> {
        self.attrs.get(&name).copied()
    }

    pub(crate) fn contains(&self, name: StringId) -> bool {
        self.attrs.contains_key(&name)
    }

    /// Binds `name`, returning false without modifying the scope if it is already bound.
    pub(crate) fn insert(&mut self, name: StringId, attr: Attr) -> bool {
        match self.attrs.entry(name) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(attr);
                true
            }
        }
    }

    /// Enum types declared directly in this scope, in declaration order.
    pub fn enum_types(&self) -> impl Iterator<Item = EnumTypeId> + '_ {
        self.attrs.values().filter_map(|attr| match attr {
            Attr::EnumType(id) => Some(*id),
            _ => None,
        })
    }

    /// Nested scopes, in declaration order.
    pub fn child_scopes(&self) -> impl Iterator<Item = ScopeId> + '_ {
        self.attrs.values().filter_map(|attr| match attr {
            Attr::Scope(id) => Some(*id),
            _ => None,
        })
    }

    /// Native functions bound in this scope, in declaration order.
    pub fn functions(&self) -> impl Iterator<Item = FunctionId> + '_ {
        self.attrs.values().filter_map(|attr| match attr {
            Attr::Function(id) => Some(*id),
            _ => None,
        })
    }
}
