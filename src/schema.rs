//! JSON-Schema-like description of a class: type tags, nested properties and
//! items, descriptions, required fields and validation constraints.
pub mod comment;
pub mod constraint;

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::catalog::MetadataProvider;
use crate::classify::{classify, Category};
use crate::error::{ConvertError, Result};
use crate::guard::OpenPath;
use crate::model::{ClassDescriptor, TypeDescriptor};

// ------------------------------- Policy ---------------------------------- //

/// Basic schema type by lowercased type name; anything unlisted is a number.
static BASIC_TYPES: Lazy<HashMap<&'static str, SchemaType>> = Lazy::new(|| {
    let mut t = HashMap::new();
    t.insert("boolean", SchemaType::Boolean);
    for name in ["char", "string", "bigdecimal", "date"] {
        t.insert(name, SchemaType::String);
    }
    for name in ["byte", "short", "int", "long", "integer", "biginteger"] {
        t.insert(name, SchemaType::Integer);
    }
    t
});

// -------------------------------- Types ---------------------------------- //

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType { Boolean, Integer, Number, String, Array, Object }

/// One schema node. Serialized member order is fixed by field order here.
///
/// Object nodes always carry `properties`; array nodes carry `items` and
/// never `properties` or `required`. String constraints only appear on
/// string nodes and numeric ones only on integer/number nodes, which the
/// constraint rules guarantee.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaNode {
    #[serde(rename = "type")]
    pub ty: SchemaType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaNode>>,
    #[serde(default, skip_serializing_if = "IndexSet::is_empty")]
    pub required: IndexSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum: Option<Number>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_minimum: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusive_maximum: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SchemaType {
    /// Tag for a primitive or catalogued type name (`int`, `Integer`, `BigDecimal`, ...).
    pub fn basic(type_name: &str) -> Self {
        BASIC_TYPES
            .get(type_name.to_lowercase().as_str())
            .copied()
            .unwrap_or(SchemaType::Number)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SchemaType::Boolean => "boolean",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::String => "string",
            SchemaType::Array => "array",
            SchemaType::Object => "object",
        }
    }
}

impl SchemaNode {
    pub fn basic(ty: SchemaType) -> Self {
        Self {
            ty,
            properties: None,
            items: None,
            required: IndexSet::new(),
            min_length: None,
            max_length: None,
            pattern: None,
            minimum: None,
            maximum: None,
            exclusive_minimum: None,
            exclusive_maximum: None,
            description: None,
        }
    }

    pub fn object() -> Self {
        Self { properties: Some(IndexMap::new()), ..Self::basic(SchemaType::Object) }
    }

    pub fn array(items: SchemaNode) -> Self {
        Self { items: Some(Box::new(items)), ..Self::basic(SchemaType::Array) }
    }

    /// Insert or replace a property; a replaced name keeps its position.
    fn set_property(&mut self, name: &str, node: SchemaNode) {
        self.properties.get_or_insert_with(IndexMap::new).insert(name.to_string(), node);
    }
}

// ------------------------------- Builder --------------------------------- //

pub struct SchemaBuilder<'p, P: ?Sized> {
    provider: &'p P,
    path: OpenPath,
}

impl<'p, P: MetadataProvider + ?Sized> SchemaBuilder<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self { provider, path: OpenPath::default() }
    }

    /// Object node for `class`, fields of the whole supertype chain included
    /// (root-most first). Static and untyped fields are skipped.
    pub fn build(&mut self, class: &ClassDescriptor) -> Result<SchemaNode> {
        self.path.enter(&class.name)?;
        let chain = self.supertype_chain(class)?;

        let mut root = SchemaNode::object();
        for c in chain {
            for field in &c.fields {
                if field.is_static {
                    tracing::debug!(class = %c.name, field = %field.name, "skipping static field");
                    continue;
                }
                let Some(ty) = field.ty.as_ref() else {
                    tracing::debug!(class = %c.name, field = %field.name, "skipping field without a type");
                    continue;
                };

                let mut node = self.schema_for(ty)?;
                node.description = Some(comment::description(field));
                let required = constraint::apply(&mut node, field)?;

                root.set_property(&field.name, node);
                if required {
                    root.required.insert(field.name.clone());
                }
            }
        }
        self.path.leave();
        Ok(root)
    }

    pub fn schema_for(&mut self, ty: &TypeDescriptor) -> Result<SchemaNode> {
        let node = match classify(ty)? {
            Category::Object => SchemaNode::object(),
            Category::Primitive(_) | Category::Normal(_) => SchemaNode::basic(SchemaType::basic(&ty.name)),
            Category::Array(element) => SchemaNode::array(self.schema_for(element)?),
            Category::ListLike(Some(item)) => SchemaNode::array(self.schema_for(item)?),
            Category::ListLike(None) => SchemaNode::array(SchemaNode::object()),
            // key/value shape is not modelled
            Category::MapLike(_) => SchemaNode::object(),
            Category::UserType => {
                let provider = self.provider;
                let class = provider.resolve(ty)?;
                tracing::trace!(class = %class.name, depth = self.path.depth(), "expanding user type");
                self.build(class)?
            }
        };
        Ok(node)
    }

    /// `class` and its ancestors, root-most first.
    fn supertype_chain<'c>(&self, class: &'c ClassDescriptor) -> Result<Vec<&'c ClassDescriptor>>
    where
        'p: 'c,
    {
        let provider = self.provider;
        let mut chain = vec![class];
        let mut current = class;
        while let Some(parent) = provider.superclass(current)? {
            if chain.iter().any(|c| c.name == parent.name) {
                let mut path: Vec<String> = chain.iter().rev().map(|c| c.name.clone()).collect();
                path.push(parent.name.clone());
                return Err(ConvertError::StructuralExhaustion { class: parent.name.clone(), path });
            }
            chain.push(parent);
            current = parent;
        }
        chain.reverse();
        Ok(chain)
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{fixture, ModelCatalog};
    use serde_json::{json, Value};

    fn schema(cat: &ModelCatalog, name: &str) -> Result<Value> {
        let class = cat.class(name).unwrap();
        let node = SchemaBuilder::new(cat).build(class)?;
        Ok(serde_json::to_value(&node).unwrap())
    }

    // tiny helper to read shallow JSON Pointers for tests
    fn at<'a>(v: &'a Value, ptr: &str) -> &'a Value {
        v.pointer(ptr).unwrap_or_else(|| panic!("missing {ptr} in {v}"))
    }

    #[test]
    fn point_schema() {
        let cat = fixture(json!({ "classes": [
            { "name": "Point", "fields": [
                { "name": "x", "type": "int" },
                { "name": "y", "type": "int" }
            ]}
        ]}));
        let s = schema(&cat, "Point").unwrap();
        assert_eq!(s, json!({
            "type": "object",
            "properties": {
                "x": { "type": "integer", "description": "" },
                "y": { "type": "integer", "description": "" }
            }
        }));
        assert!(s.get("required").is_none());
    }

    #[test]
    fn user_schema_with_constraints_serializes_in_order() {
        let cat = fixture(json!({ "classes": [
            { "name": "User", "fields": [
                { "name": "name", "type": "String",
                  "annotations": ["javax.validation.constraints.NotBlank"] },
                { "name": "age", "type": "Integer",
                  "annotations": [
                    { "name": "javax.validation.constraints.Min", "attributes": { "value": 0 } },
                    { "name": "javax.validation.constraints.Max", "attributes": { "value": 150 } }
                  ] }
            ]}
        ]}));
        let class = cat.class("User").unwrap();
        let node = SchemaBuilder::new(&cat).build(class).unwrap();
        assert_eq!(
            serde_json::to_string(&node).unwrap(),
            concat!(
                r#"{"type":"object","properties":{"#,
                r#""name":{"type":"string","minLength":1,"description":""},"#,
                r#""age":{"type":"integer","minimum":0,"maximum":150,"description":""}},"#,
                r#""required":["name"]}"#
            )
        );
    }

    #[test]
    fn list_items_hold_the_nested_schema() {
        let cat = fixture(json!({ "classes": [
            { "name": "User", "fields": [{ "name": "name", "type": "String" }] },
            { "name": "Group", "fields": [
                { "name": "members", "type": "List<User>", "doc": "/** everyone */" },
                { "name": "raw", "type": "Collection" },
                { "name": "grid", "type": "double[][]" }
            ]}
        ]}));
        let s = schema(&cat, "Group").unwrap();
        assert_eq!(at(&s, "/properties/members/type"), "array");
        assert_eq!(at(&s, "/properties/members/description"), "everyone");
        assert_eq!(at(&s, "/properties/members/items"), &json!({
            "type": "object",
            "properties": { "name": { "type": "string", "description": "" } }
        }));
        assert_eq!(at(&s, "/properties/raw/items"), &json!({ "type": "object", "properties": {} }));
        assert_eq!(at(&s, "/properties/grid/items/items/type"), "number");
    }

    #[test]
    fn map_degrades_to_empty_object() {
        let cat = fixture(json!({ "classes": [
            { "name": "Bag", "fields": [{ "name": "counts", "type": "Map<String, Integer>" }] }
        ]}));
        let s = schema(&cat, "Bag").unwrap();
        assert_eq!(at(&s, "/properties/counts"), &json!({
            "type": "object", "properties": {}, "description": ""
        }));
    }

    #[test]
    fn basic_type_table() {
        let cases = [
            ("boolean", "boolean"), ("Boolean", "boolean"),
            ("char", "string"), ("String", "string"), ("BigDecimal", "string"), ("Date", "string"),
            ("byte", "integer"), ("Short", "integer"), ("int", "integer"), ("Long", "integer"),
            ("float", "number"), ("Double", "number"),
        ];
        for (name, expected) in cases {
            assert_eq!(SchemaType::basic(name).as_str(), expected, "{name}");
        }
    }

    #[test]
    fn whole_supertype_chain_root_first_without_statics() {
        let cat = fixture(json!({ "classes": [
            { "name": "A", "parent": "Object", "fields": [
                { "name": "a", "type": "int" },
                { "name": "COUNT", "type": "int", "static": true },
                { "name": "after", "type": "int" }
            ]},
            { "name": "B", "parent": "A", "fields": [{ "name": "b", "type": "int" }] },
            { "name": "C", "parent": "B", "fields": [
                { "name": "c", "type": "int" },
                { "name": "unknown" }
            ]}
        ]}));
        let s = schema(&cat, "C").unwrap();
        let keys: Vec<&String> = s["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["a", "after", "b", "c"]);
    }

    #[test]
    fn redeclared_field_keeps_its_slot() {
        let cat = fixture(json!({ "classes": [
            { "name": "Base", "fields": [
                { "name": "id", "type": "Long" },
                { "name": "code", "type": "int" }
            ]},
            { "name": "Item", "parent": "Base", "fields": [
                { "name": "title", "type": "String" },
                { "name": "id", "type": "String", "annotations": ["javax.validation.constraints.NotNull"] }
            ]}
        ]}));
        let s = schema(&cat, "Item").unwrap();
        let keys: Vec<&String> = s["properties"].as_object().unwrap().keys().collect();
        assert_eq!(keys, ["id", "code", "title"]);
        assert_eq!(at(&s, "/properties/id/type"), "string");
        assert_eq!(s["required"], json!(["id"]));
    }

    #[test]
    fn schema_counts_only_non_static_fields_but_skeleton_counts_all() {
        let cat = fixture(json!({ "classes": [
            { "name": "Address", "fields": [
                { "name": "street", "type": "String" },
                { "name": "DEFAULT_CITY", "type": "String", "static": true }
            ]},
            { "name": "Person", "fields": [
                { "name": "home", "type": "Address" },
                { "name": "INSTANCES", "type": "int", "static": true }
            ]}
        ]}));
        let s = schema(&cat, "Person").unwrap();
        let class = cat.class("Person").unwrap();
        let k = Value::Object(crate::skeleton::SkeletonBuilder::new(&cat).build(class).unwrap());

        fn count_schema(v: &Value) -> usize {
            v.get("properties").and_then(Value::as_object)
                .map(|p| p.values().map(|f| 1 + count_schema(f)).sum())
                .unwrap_or(0)
        }
        fn count_skeleton(v: &Value) -> usize {
            v.as_object().map(|o| o.values().map(|f| 1 + count_skeleton(f)).sum()).unwrap_or(0)
        }
        assert_eq!(count_schema(&s), 2);
        assert_eq!(count_skeleton(&k), 4);
    }

    #[test]
    fn self_reference_fails_fast() {
        let cat = fixture(json!({ "classes": [
            { "name": "Node", "fields": [{ "name": "next", "type": "Node" }] }
        ]}));
        let err = schema(&cat, "Node").unwrap_err();
        let ConvertError::StructuralExhaustion { class, path } = err else { panic!("expected cycle") };
        assert_eq!(class, "Node");
        assert_eq!(path, ["Node", "Node"]);
    }

    #[test]
    fn cyclic_inheritance_fails_fast() {
        let cat = fixture(json!({ "classes": [
            { "name": "A", "parent": "B" },
            { "name": "B", "parent": "A" }
        ]}));
        assert!(matches!(schema(&cat, "A"), Err(ConvertError::StructuralExhaustion { .. })));
    }

    #[test]
    fn malformed_constraint_aborts_the_whole_tree() {
        let cat = fixture(json!({ "classes": [
            { "name": "Inner", "fields": [{ "name": "rate", "type": "Double",
              "annotations": [{ "name": "javax.validation.constraints.DecimalMin", "attributes": { "value": "x" } }] }] },
            { "name": "Outer", "fields": [{ "name": "inner", "type": "Inner" }] }
        ]}));
        assert!(matches!(schema(&cat, "Outer"), Err(ConvertError::MalformedConstraint { .. })));
    }

    #[test]
    fn round_trip_through_text_is_identical() {
        let cat = fixture(json!({ "classes": [
            { "name": "Leaf", "fields": [{ "name": "v", "type": "Float",
              "annotations": ["javax.validation.constraints.Negative"] }] },
            { "name": "Root", "fields": [
                { "name": "label", "type": "String", "text": "// shown to users",
                  "annotations": [{ "name": "javax.validation.constraints.Size", "attributes": { "min": 1, "max": 20 } }] },
                { "name": "leaves", "type": "Leaf[]" }
            ]}
        ]}));
        let class = cat.class("Root").unwrap();
        let node = SchemaBuilder::new(&cat).build(class).unwrap();
        let text = serde_json::to_string_pretty(&node).unwrap();
        let back: SchemaNode = serde_json::from_str(&text).unwrap();
        assert_eq!(back, node);
        assert_eq!(serde_json::to_string_pretty(&back).unwrap(), text);
        assert_eq!(node.properties.as_ref().unwrap()["label"].description.as_deref(), Some("shown to users"));
    }
}
