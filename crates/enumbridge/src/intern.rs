//! String interning for scope, enum, member and function names.
//!
//! Names are interned once while the registry is being built and referenced by
//! [`StringId`] afterwards, so attribute maps key on a `u32` rather than owning
//! their own copies of every identifier. After [`RegistryBuilder::finish`](crate::RegistryBuilder::finish)
//! the interner is read-only: lookups from the host surface go through
//! [`Interns::lookup`], which never allocates.

use ahash::AHashMap;

/// Index into the string interner's storage.
///
/// Uses `u32` to save space (4 bytes vs 8 bytes for `usize`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
pub struct StringId(u32);

impl StringId {
    /// Returns the raw index value.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Append-only string table.
#[derive(Debug, Default, Clone)]
pub(crate) struct Interns {
    strings: Vec<Box<str>>,
    ids: AHashMap<Box<str>, StringId>,
}

impl Interns {
    #[cfg(test)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `s`, returning the existing id if it was seen before.
    pub fn intern(&mut self, s: &str) -> StringId {
        if let Some(&id) = self.ids.get(s) {
            return id;
        }
        let id = StringId(u32::try_from(self.strings.len()).expect("Invalid string id"));
        self.strings.push(s.into());
        self.ids.insert(s.into(), id);
        id
    }

    /// Looks up an already interned string without inserting it.
    pub fn lookup(&self, s: &str) -> Option<StringId> {
        self.ids.get(s).copied()
    }

    /// Returns the string for `id`.
    ///
    /// # Panics
    /// Panics if `id` was produced by a different interner.
    pub fn get_str(&self, id: StringId) -> &str {
        &self.strings[id.index()]
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.strings.len()
    }
}
