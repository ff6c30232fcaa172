//! # Lumen Core Variant Values
//!
//! The universal tagged-union value type used to configure plugin instances
//! and to carry results back across the plugin boundary. Every supported
//! payload has its own discriminant; reading a value back through the wrong
//! discriminant is rejected with [`TypeMismatch`] instead of being coerced.
use std::cmp::Ordering;

use serde::{Deserialize, Serialize};


/// A 2D point with integer coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

/// A 2D extent with integer dimensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Discriminant of a [`Variant`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VariantKind {
    Empty,
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
    Point,
    Size,
    Rect,
    Str,
    Blob,
    Array,
}

impl VariantKind {
    /// Whether values of this kind form a total order usable for min/max
    /// range constraints.
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            VariantKind::I8
                | VariantKind::U8
                | VariantKind::I16
                | VariantKind::U16
                | VariantKind::I32
                | VariantKind::U32
                | VariantKind::F32
                | VariantKind::F64
        )
    }
}

/// Error returned when a [`Variant`] is read through the wrong discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("variant type mismatch: expected {expected:?}, found {found:?}")]
pub struct TypeMismatch {
    pub expected: VariantKind,
    pub found: VariantKind,
}

/// The universal tagged-union value for plugin configuration.
///
/// Numeric width and signedness round-trip exactly; there is no implicit
/// widening or narrowing across `set`/`get`. The default-constructed value
/// is [`Variant::Empty`], distinct from every valid payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    Empty,
    Bool(bool),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    F32(f32),
    F64(f64),
    Point(Point),
    Size(Size),
    Rect(Rect),
    Str(String),
    Blob(Vec<u8>),
    /// Array of variants, used for indexed/dynamic properties (one entry per
    /// detected blob, capture frame, ...).
    Array(Vec<Variant>),
}

impl Variant {
    /// The discriminant of the stored value.
    pub fn kind(&self) -> VariantKind {
        match self {
            Variant::Empty => VariantKind::Empty,
            Variant::Bool(_) => VariantKind::Bool,
            Variant::I8(_) => VariantKind::I8,
            Variant::U8(_) => VariantKind::U8,
            Variant::I16(_) => VariantKind::I16,
            Variant::U16(_) => VariantKind::U16,
            Variant::I32(_) => VariantKind::I32,
            Variant::U32(_) => VariantKind::U32,
            Variant::F32(_) => VariantKind::F32,
            Variant::F64(_) => VariantKind::F64,
            Variant::Point(_) => VariantKind::Point,
            Variant::Size(_) => VariantKind::Size,
            Variant::Rect(_) => VariantKind::Rect,
            Variant::Str(_) => VariantKind::Str,
            Variant::Blob(_) => VariantKind::Blob,
            Variant::Array(_) => VariantKind::Array,
        }
    }

    /// Whether this is the empty value.
    pub fn is_empty(&self) -> bool {
        matches!(self, Variant::Empty)
    }

    /// Construct a variant from a typed value.
    pub fn from_value<T: VariantValue>(value: T) -> Self {
        value.into_variant()
    }

    /// Store a typed value, replacing whatever was held before.
    pub fn set<T: VariantValue>(&mut self, value: T) {
        *self = value.into_variant();
    }

    /// Read the value back as `T`. Fails unless the stored discriminant is
    /// exactly the one `T` maps to.
    pub fn get<T: VariantValue>(&self) -> Result<T, TypeMismatch> {
        T::from_variant(self).ok_or(TypeMismatch {
            expected: T::KIND,
            found: self.kind(),
        })
    }

    /// Compare two variants of the same ordered (numeric) kind.
    ///
    /// Returns `None` when the kinds differ or the kind is not ordered.
    /// Used for validating values against descriptor min/max bounds.
    pub fn scalar_cmp(&self, other: &Variant) -> Option<Ordering> {
        match (self, other) {
            (Variant::I8(a), Variant::I8(b)) => Some(a.cmp(b)),
            (Variant::U8(a), Variant::U8(b)) => Some(a.cmp(b)),
            (Variant::I16(a), Variant::I16(b)) => Some(a.cmp(b)),
            (Variant::U16(a), Variant::U16(b)) => Some(a.cmp(b)),
            (Variant::I32(a), Variant::I32(b)) => Some(a.cmp(b)),
            (Variant::U32(a), Variant::U32(b)) => Some(a.cmp(b)),
            (Variant::F32(a), Variant::F32(b)) => a.partial_cmp(b),
            (Variant::F64(a), Variant::F64(b)) => a.partial_cmp(b),
            _ => None,
        }
    }

    /// Check `min <= self <= max` for whichever bounds are present.
    ///
    /// A bound whose kind does not match is treated as violated, not
    /// ignored: a descriptor like that would not have passed validation.
    pub fn in_range(&self, min: Option<&Variant>, max: Option<&Variant>) -> bool {
        if let Some(min) = min {
            match self.scalar_cmp(min) {
                Some(Ordering::Less) | None => return false,
                _ => {}
            }
        }
        if let Some(max) = max {
            match self.scalar_cmp(max) {
                Some(Ordering::Greater) | None => return false,
                _ => {}
            }
        }
        true
    }
}

/// Conversion between Rust types and [`Variant`] payloads.
///
/// Each implementing type maps to exactly one [`VariantKind`]; the blanket
/// accessors on [`Variant`] use this to keep reads discriminant-checked.
pub trait VariantValue: Sized {
    /// The discriminant this type maps to.
    const KIND: VariantKind;

    /// Wrap the value in a variant.
    fn into_variant(self) -> Variant;

    /// Extract the value if the discriminant matches.
    fn from_variant(variant: &Variant) -> Option<Self>;
}

macro_rules! impl_variant_value {
    ($($ty:ty => $kind:ident),* $(,)?) => {
        $(
            impl VariantValue for $ty {
                const KIND: VariantKind = VariantKind::$kind;

                fn into_variant(self) -> Variant {
                    Variant::$kind(self)
                }

                fn from_variant(variant: &Variant) -> Option<Self> {
                    match variant {
                        Variant::$kind(value) => Some(value.clone()),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_variant_value! {
    bool => Bool,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    f32 => F32,
    f64 => F64,
    Point => Point,
    Size => Size,
    Rect => Rect,
    String => Str,
    Vec<u8> => Blob,
    Vec<Variant> => Array,
}

impl From<&str> for Variant {
    fn from(value: &str) -> Self {
        Variant::Str(value.to_string())
    }
}
