use serde::{Deserialize, Serialize};

use crate::descriptor::error::DescriptorError;
use crate::variant::{Variant, VariantKind};

/// Hint telling a descriptor-driven UI which editor widget fits best.
///
/// Purely advisory: the UI layer renders property editors from descriptor
/// metadata alone, without any plugin-specific code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EditorHint {
    #[default]
    Default,
    Slider,
    SpinBox,
    Checkbox,
    TextBox,
    FilePath,
}

/// Immutable template describing one configurable property of a plugin.
///
/// Descriptors are shared read-only between all instances of a plugin type;
/// each instance gets its own mutable value storage seeded from `default`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Discriminant every stored value must carry.
    pub kind: VariantKind,
    /// Programmatic key, stable across locales; settings are persisted under
    /// plugin GUID + this key.
    pub key: String,
    /// Human-readable display name.
    pub display_name: String,
    /// Help text shown by property editors.
    pub help: String,
    /// Read-only properties reject `set_property` from callers.
    pub read_only: bool,
    /// Dynamic properties are re-evaluated on every read (e.g. hardware LED
    /// state); set-then-get may legitimately differ.
    pub dynamic: bool,
    pub editor_hint: EditorHint,
    /// Initial value; must match `kind` and lie within `[min, max]`.
    pub default: Variant,
    /// Lower bound, only meaningful for ordered kinds.
    pub min: Option<Variant>,
    /// Upper bound, only meaningful for ordered kinds.
    pub max: Option<Variant>,
}

impl PropertyDescriptor {
    /// Create a descriptor with the given key and a default value, which
    /// also fixes the property's kind.
    pub fn new(key: &str, display_name: &str, default: Variant) -> Self {
        Self {
            kind: default.kind(),
            key: key.to_string(),
            display_name: display_name.to_string(),
            help: String::new(),
            read_only: false,
            dynamic: false,
            editor_hint: EditorHint::default(),
            default,
            min: None,
            max: None,
        }
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn dynamic(mut self) -> Self {
        self.dynamic = true;
        self
    }

    pub fn with_editor(mut self, hint: EditorHint) -> Self {
        self.editor_hint = hint;
        self
    }

    pub fn with_range(mut self, min: Variant, max: Variant) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn with_min(mut self, min: Variant) -> Self {
        self.min = Some(min);
        self
    }

    pub fn with_max(mut self, max: Variant) -> Self {
        self.max = Some(max);
        self
    }

    /// Validate internal consistency: kind agreement between default and
    /// bounds, bounds only on ordered kinds, and `min <= default <= max`
    /// whenever both ends are present.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        if self.key.is_empty() {
            return Err(DescriptorError::EmptyKey);
        }
        if self.default.kind() != self.kind {
            return Err(DescriptorError::KindMismatch {
                key: self.key.clone(),
                expected: self.kind,
                found: self.default.kind(),
            });
        }
        for bound in [&self.min, &self.max].into_iter().flatten() {
            if !self.kind.is_ordered() {
                return Err(DescriptorError::UnorderedRange {
                    key: self.key.clone(),
                    kind: self.kind,
                });
            }
            if bound.kind() != self.kind {
                return Err(DescriptorError::KindMismatch {
                    key: self.key.clone(),
                    expected: self.kind,
                    found: bound.kind(),
                });
            }
        }
        if !self.default.in_range(self.min.as_ref(), self.max.as_ref()) {
            return Err(DescriptorError::DefaultOutOfRange {
                key: self.key.clone(),
            });
        }
        Ok(())
    }

    /// Whether `value` is acceptable for this property: right kind and
    /// within the declared bounds.
    pub fn accepts(&self, value: &Variant) -> bool {
        value.kind() == self.kind && value.in_range(self.min.as_ref(), self.max.as_ref())
    }
}
