//! Tagged results of field fallback chains

/// A value produced by an ordered fallback chain.
///
/// Callers and tests can tell real upstream data apart from values that were
/// computed or substituted.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<T> {
    /// Taken from the named upstream field.
    Found { value: T, field: &'static str },
    /// Computed from other fields.
    Derived(T),
    /// Sentinel substituted because nothing usable was present.
    Defaulted(T),
}

impl<T> Resolved<T> {
    pub fn value(&self) -> &T {
        match self {
            Self::Found { value, .. } | Self::Derived(value) | Self::Defaulted(value) => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Found { value, .. } | Self::Derived(value) | Self::Defaulted(value) => value,
        }
    }

    /// Name of the upstream field the value came from, if any.
    pub fn source(&self) -> Option<&'static str> {
        match self {
            Self::Found { field, .. } => Some(field),
            Self::Derived(_) | Self::Defaulted(_) => None,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        matches!(self, Self::Defaulted(_))
    }
}
