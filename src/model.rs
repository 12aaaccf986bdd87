//! Pure-data descriptors of classes, fields and types.
//!
//! These are what a metadata provider hands to the builders. Nothing here
//! knows how the data was extracted; tests and model files construct them
//! directly.
pub mod type_expr;

use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::ConvertError;

/// Name of the universal root type.
pub const ROOT_OBJECT: &str = "Object";

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// Handle to a declared type.
///
/// In model files a type may be written either as a type expression string
/// (`"List<User>"`, `"int[]"`) or as the expanded object form.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "TypeRepr")]
pub struct TypeDescriptor {
    /// Display name, generic arguments included (`Map<String, Integer>`).
    pub name: String,
    pub primitive: bool,
    /// Element type; present iff this is an array.
    pub component: Option<Box<TypeDescriptor>>,
    pub args: Vec<TypeDescriptor>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TypeRepr {
    Text(String),
    Full {
        name: String,
        #[serde(default)]
        primitive: bool,
        #[serde(default)]
        component: Option<Box<TypeDescriptor>>,
        #[serde(default)]
        args: Vec<TypeDescriptor>,
    },
}

#[derive(Clone, Debug, Deserialize)]
pub struct FieldDescriptor {
    pub name: String,
    /// `None` when the field's type could not be determined.
    #[serde(rename = "type", default)]
    pub ty: Option<TypeDescriptor>,
    #[serde(default)]
    pub annotations: Vec<Annotation>,
    /// Structured doc comment, delimiters included (`/** ... */`).
    #[serde(default)]
    pub doc: Option<String>,
    /// Raw source text of the declaration, used to recover `//` comments.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "static", default)]
    pub is_static: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ClassDescriptor {
    pub name: String,
    /// Direct supertype, by class name.
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

/// A field annotation: qualified name plus named attribute values.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(from = "AnnotationRepr")]
pub struct Annotation {
    pub name: String,
    pub attributes: IndexMap<String, AttrValue>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnnotationRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        attributes: IndexMap<String, AttrValue>,
    },
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl TypeDescriptor {
    pub fn primitive(name: &str) -> Self {
        Self { name: name.to_string(), primitive: true, component: None, args: Vec::new() }
    }

    pub fn array_of(component: TypeDescriptor) -> Self {
        Self {
            name: format!("{}[]", component.name),
            primitive: false,
            component: Some(Box::new(component)),
            args: Vec::new(),
        }
    }

    /// A reference type, with or without generic arguments.
    pub fn generic(raw: &str, args: Vec<TypeDescriptor>) -> Self {
        let name = if args.is_empty() {
            raw.to_string()
        } else {
            let inner = args.iter().map(|a| a.name.as_str()).collect::<Vec<_>>().join(", ");
            format!("{raw}<{inner}>")
        };
        Self { name, primitive: false, component: None, args }
    }

    /// Display name with generic arguments stripped.
    pub fn raw_name(&self) -> &str {
        self.name.split('<').next().unwrap_or(&self.name).trim()
    }
}

impl TryFrom<TypeRepr> for TypeDescriptor {
    type Error = ConvertError;

    fn try_from(repr: TypeRepr) -> Result<Self, Self::Error> {
        match repr {
            TypeRepr::Text(src) => type_expr::parse(&src),
            // same canonical display name as the string form
            TypeRepr::Full { name, primitive, component, args } => {
                let name = type_expr::parse(&name)?.name;
                Ok(Self { name, primitive, component, args })
            }
        }
    }
}

impl From<AnnotationRepr> for Annotation {
    fn from(repr: AnnotationRepr) -> Self {
        match repr {
            AnnotationRepr::Name(name) => Self { name, attributes: IndexMap::new() },
            AnnotationRepr::Full { name, attributes } => Self { name, attributes },
        }
    }
}

impl Annotation {
    /// Unqualified name (`Size` for `javax.validation.constraints.Size`).
    pub fn simple_name(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }

    /// Package part of the qualified name, empty when unqualified.
    pub fn namespace(&self) -> &str {
        self.name.rsplit_once('.').map(|(ns, _)| ns).unwrap_or("")
    }

    pub fn attr(&self, key: &str) -> Option<&AttrValue> { self.attributes.get(key) }
}

impl AttrValue {
    pub fn kind(&self) -> &'static str {
        match self {
            AttrValue::Bool(_) => "boolean",
            AttrValue::Int(_) => "integer",
            AttrValue::Str(_) => "string",
        }
    }
}

// ------------------------------- Tests ------------------------------------ //
