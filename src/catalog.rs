//! Metadata providers: where the builders get class definitions from.
use indexmap::IndexMap;
use serde::Deserialize;

use crate::error::{ConvertError, Result};
use crate::model::{ClassDescriptor, TypeDescriptor, ROOT_OBJECT};

/// Source of class metadata for the builders.
pub trait MetadataProvider {
    fn class(&self, name: &str) -> Option<&ClassDescriptor>;

    /// Class definition behind a user type, looked up by raw name.
    fn resolve(&self, ty: &TypeDescriptor) -> Result<&ClassDescriptor> {
        self.class(ty.raw_name())
            .ok_or_else(|| ConvertError::Resolution(ty.name.clone()))
    }

    /// Direct supertype, `None` at the root.
    fn superclass(&self, class: &ClassDescriptor) -> Result<Option<&ClassDescriptor>> {
        match class.parent.as_deref() {
            None | Some(ROOT_OBJECT) => Ok(None),
            Some(parent) => self
                .class(parent)
                .map(Some)
                .ok_or_else(|| ConvertError::Resolution(parent.to_string())),
        }
    }
}

/// On-disk model document.
#[derive(Debug, Deserialize)]
pub struct ModelDocument {
    pub classes: Vec<ClassDescriptor>,
}

/// In-memory provider built from one or more model documents.
#[derive(Debug, Default)]
pub struct ModelCatalog {
    classes: IndexMap<String, ClassDescriptor>,
}

impl ModelCatalog {
    pub fn new() -> Self { Self::default() }

    /// Parse a model document and merge its classes.
    pub fn load_str(&mut self, source_name: &str, src: &str) -> Result<usize> {
        let doc: ModelDocument = crate::path_de::from_str_with_path(source_name, src)?;
        Ok(self.extend(source_name, doc))
    }

    fn extend(&mut self, source_name: &str, doc: ModelDocument) -> usize {
        let count = doc.classes.len();
        for class in doc.classes {
            let name = class.name.clone();
            // replaced entries keep their original slot
            if self.classes.insert(name.clone(), class).is_some() {
                tracing::warn!(source = source_name, class = %name, "duplicate class definition replaces an earlier one");
            }
        }
        tracing::info!(source = source_name, classes = count, "loaded model");
        count
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.classes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize { self.classes.len() }

    pub fn is_empty(&self) -> bool { self.classes.is_empty() }
}

impl MetadataProvider for ModelCatalog {
    fn class(&self, name: &str) -> Option<&ClassDescriptor> { self.classes.get(name) }
}

// ------------------------------- Tests ------------------------------------ //

/// Catalogue built from an inline `{ "classes": [...] }` fixture.
#[cfg(test)]
pub(crate) fn fixture(value: serde_json::Value) -> ModelCatalog {
    let mut cat = ModelCatalog::new();
    cat.load_str("fixture", &value.to_string()).unwrap();
    cat
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog(value: serde_json::Value) -> ModelCatalog { fixture(value) }

    #[test]
    fn later_definition_replaces_in_place() {
        let mut cat = catalog(json!({ "classes": [
            { "name": "A", "fields": [] },
            { "name": "B", "fields": [] }
        ]}));
        let second = json!({ "classes": [
            { "name": "A", "fields": [{ "name": "x", "type": "int" }] }
        ]});
        cat.load_str("second", &second.to_string()).unwrap();
        assert_eq!(cat.names().collect::<Vec<_>>(), ["A", "B"]);
        assert_eq!(cat.class("A").unwrap().fields.len(), 1);
        assert_eq!(cat.len(), 2);
    }

    #[test]
    fn superclass_stops_at_root_object() {
        let cat = catalog(json!({ "classes": [
            { "name": "Base", "parent": "Object" },
            { "name": "Child", "parent": "Base" },
            { "name": "Orphan", "parent": "Missing" }
        ]}));
        let child = cat.class("Child").unwrap();
        let base = cat.superclass(child).unwrap().unwrap();
        assert_eq!(base.name, "Base");
        assert!(cat.superclass(base).unwrap().is_none());

        let orphan = cat.class("Orphan").unwrap();
        assert!(matches!(cat.superclass(orphan), Err(ConvertError::Resolution(n)) if n == "Missing"));
    }

    #[test]
    fn resolve_uses_raw_name() {
        let cat = catalog(json!({ "classes": [{ "name": "Page" }] }));
        let ty = crate::model::type_expr::parse("Page<User>").unwrap();
        assert_eq!(cat.resolve(&ty).unwrap().name, "Page");
        let ty = crate::model::type_expr::parse("Unknown").unwrap();
        assert!(matches!(cat.resolve(&ty), Err(ConvertError::Resolution(_))));
    }

    #[test]
    fn load_error_names_the_json_path() {
        let mut cat = ModelCatalog::new();
        let err = cat.load_str("bad.json", r#"{ "classes": [ { "name": "A", "fields": [ { "name": 3 } ] } ] }"#)
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("bad.json"), "{msg}");
        assert!(msg.contains("classes[0].fields[0].name"), "{msg}");
        assert!(cat.is_empty());
    }
}
