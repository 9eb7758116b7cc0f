use ahash::AHashSet;
use std::fmt;

/// Type tag attached to every interface parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamType {
    /// Untyped value supplied by the caller.
    Dynamic,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::Dynamic => write!(f, "dynamic"),
        }
    }
}

/// The ordered set of externally supplied parameters a generated class accepts.
///
/// Entries are only ever added. Insertion order is kept because it becomes the order of
/// the constructor signature.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterInventory {
    entries: Vec<(String, ParamType)>,
    names: AHashSet<String>,
}

impl ParameterInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` as a dynamic parameter. Returns `true` if it was new.
    pub fn register(&mut self, name: &str) -> bool {
        self.register_typed(name, ParamType::Dynamic)
    }

    pub fn register_typed(&mut self, name: &str, ty: ParamType) -> bool {
        if !self.names.insert(name.to_string()) {
            return false;
        }
        self.entries.push((name.to_string(), ty));
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn get(&self, name: &str) -> Option<ParamType> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, ty)| *ty)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ParamType)> {
        self.entries.iter().map(|(n, ty)| (n.as_str(), *ty))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_superset_of(&self, other: &ParameterInventory) -> bool {
        other.names().all(|n| self.contains(n))
    }
}
