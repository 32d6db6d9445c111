//! Tagged absence for catalog-sourced text fields.
//!
//! The catalog and the detail page frequently omit fields. Downstream logic
//! branches on whether a field was present (layout selection, admissibility,
//! search-text precedence), so absence is modelled explicitly instead of as an
//! empty string.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Marker written into indexed documents in place of an absent field.
///
/// Existing consumers of the target index filter on this literal, so the
/// serialized shape keeps it.
pub const ABSENT_MARKER: &str = "없음";

/// A text field that may be absent from the catalog source.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CatalogField {
    /// The source carried a value.
    Present(String),
    /// The source did not carry this field.
    #[default]
    Absent,
}

impl CatalogField {
    /// Build a field from raw source text; empty text is treated as absent.
    pub fn from_raw(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self::Absent
        } else {
            Self::Present(value)
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn is_present(&self) -> bool {
        !self.is_absent()
    }

    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Present(value) => Some(value.as_str()),
            Self::Absent => None,
        }
    }

    /// Apply `f` to a present value, leaving absence untouched.
    pub fn map<F>(self, f: F) -> Self
    where
        F: FnOnce(String) -> String,
    {
        match self {
            Self::Present(value) => Self::Present(f(value)),
            Self::Absent => Self::Absent,
        }
    }
}

impl From<Option<String>> for CatalogField {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Absent, Self::from_raw)
    }
}

impl Serialize for CatalogField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_deref().unwrap_or(ABSENT_MARKER))
    }
}

impl<'de> Deserialize<'de> for CatalogField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(match value {
            Some(v) if v == ABSENT_MARKER => Self::Absent,
            other => Self::from(other),
        })
    }
}
