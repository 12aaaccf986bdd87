//! Type classification.
//!
//! Maps a type descriptor to a structural category by a fixed, ordered list
//! of name-based rules. The first matching rule wins:
//!
//! 1. display name `Object`                               → `Object`
//! 2. primitive flag                                      → `Primitive`
//! 3. array flag                                          → `Array`
//! 4. raw name contains `List`, or equals `Collection`    → `ListLike`
//! 5. raw name contains `Map`                             → `MapLike`
//! 6. display name in the normal-type catalogue           → `Normal`
//! 7. anything else                                       → `UserType`
//!
//! This is a heuristic over names, not generic resolution: `UserCollection`
//! falls through to rule 7 while `MyListOfThings` hits rule 4.
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use crate::error::{ConvertError, Result};
use crate::model::{TypeDescriptor, ROOT_OBJECT};

// ------------------------------- Policy ---------------------------------- //

/// Wrapper/value types with their representative default.
static NORMAL_TYPES: Lazy<IndexMap<&'static str, Value>> = Lazy::new(|| {
    IndexMap::from([
        ("Boolean", json!(false)),
        ("Byte", json!(0)),
        ("Short", json!(0)),
        ("Integer", json!(0)),
        ("Long", json!(0)),
        ("Float", json!(0.0)),
        ("Double", json!(0.0)),
        ("String", json!("")),
        ("BigDecimal", json!("0.0")),
        ("Date", json!("")),
    ])
});

const LIST_MARKER: &str = "List";
const COLLECTION: &str = "Collection";
const MAP_MARKER: &str = "Map";

// -------------------------------- Types ---------------------------------- //

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimitiveKind { Boolean, Byte, Short, Char, Int, Long, Float, Double }

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Category<'a> {
    Object,
    Primitive(PrimitiveKind),
    Array(&'a TypeDescriptor),
    /// Element type, `None` for a raw collection.
    ListLike(Option<&'a TypeDescriptor>),
    /// Key and value types, `None` unless both are given.
    MapLike(Option<(&'a TypeDescriptor, &'a TypeDescriptor)>),
    Normal(&'static Value),
    UserType,
}

impl PrimitiveKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "boolean" => Self::Boolean,
            "byte" => Self::Byte,
            "short" => Self::Short,
            "char" => Self::Char,
            "int" => Self::Int,
            "long" => Self::Long,
            "float" => Self::Float,
            "double" => Self::Double,
            _ => return None,
        })
    }

    /// Zero value used in skeletons.
    pub fn default_value(self) -> Value {
        match self {
            Self::Boolean => json!(false),
            Self::Byte | Self::Short | Self::Int | Self::Long => json!(0),
            Self::Float | Self::Double => json!(0.0),
            // char is tagged "string" in schemas; keep the skeleton consistent
            Self::Char => json!(""),
        }
    }
}

// ------------------------------- Classify -------------------------------- //

pub fn classify(ty: &TypeDescriptor) -> Result<Category<'_>> {
    if ty.name == ROOT_OBJECT {
        return Ok(Category::Object);
    }
    if ty.primitive {
        return PrimitiveKind::from_name(&ty.name)
            .map(Category::Primitive)
            .ok_or_else(|| ConvertError::Resolution(ty.name.clone()));
    }
    if let Some(component) = ty.component.as_deref() {
        return Ok(Category::Array(component));
    }

    let raw = ty.raw_name();
    if raw.contains(LIST_MARKER) || raw == COLLECTION {
        return Ok(Category::ListLike(ty.args.first()));
    }
    if raw.contains(MAP_MARKER) {
        let kv = match ty.args.as_slice() {
            [key, value, ..] => Some((key, value)),
            _ => None,
        };
        return Ok(Category::MapLike(kv));
    }
    if let Some(default) = NORMAL_TYPES.get(ty.name.as_str()) {
        return Ok(Category::Normal(default));
    }
    Ok(Category::UserType)
}

// ------------------------------- Tests ------------------------------------ //
