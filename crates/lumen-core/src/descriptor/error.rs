//! Validation errors for the descriptor model.
use crate::variant::VariantKind;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DescriptorError {
    #[error("{what} must not be the nil GUID")]
    NilGuid { what: String },

    #[error("descriptor is missing a programmatic key")]
    EmptyKey,

    #[error("property '{key}': expected kind {expected:?}, found {found:?}")]
    KindMismatch {
        key: String,
        expected: VariantKind,
        found: VariantKind,
    },

    #[error("property '{key}': kind {kind:?} is not ordered and cannot carry min/max bounds")]
    UnorderedRange { key: String, kind: VariantKind },

    #[error("property '{key}': default value lies outside [min, max]")]
    DefaultOutOfRange { key: String },

    #[error("duplicate property key '{0}' in plugin descriptor")]
    DuplicatePropertyKey(String),
}
