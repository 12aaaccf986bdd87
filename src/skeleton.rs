//! Example payloads: a class's fields filled with representative defaults.
use serde_json::{Map, Value};

use crate::catalog::MetadataProvider;
use crate::classify::{classify, Category};
use crate::error::{ConvertError, Result};
use crate::guard::OpenPath;
use crate::model::{ClassDescriptor, TypeDescriptor};

pub struct SkeletonBuilder<'p, P: ?Sized> {
    provider: &'p P,
    path: OpenPath,
}

impl<'p, P: MetadataProvider + ?Sized> SkeletonBuilder<'p, P> {
    pub fn new(provider: &'p P) -> Self {
        Self { provider, path: OpenPath::default() }
    }

    /// Fields of the direct parent (unless it is the root) come first, then
    /// the class's own. A repeated name overwrites in place. Static fields
    /// are kept.
    pub fn build(&mut self, class: &ClassDescriptor) -> Result<Map<String, Value>> {
        self.path.enter(&class.name)?;
        let provider = self.provider;
        let mut out = Map::new();
        if let Some(parent) = provider.superclass(class)? {
            self.insert_fields(parent, &mut out)?;
        }
        self.insert_fields(class, &mut out)?;
        self.path.leave();
        Ok(out)
    }

    fn insert_fields(&mut self, class: &ClassDescriptor, out: &mut Map<String, Value>) -> Result<()> {
        for field in &class.fields {
            let ty = field.ty.as_ref().ok_or_else(|| {
                ConvertError::Resolution(format!("{}.{}", class.name, field.name))
            })?;
            out.insert(field.name.clone(), self.field_value(ty)?);
        }
        Ok(())
    }

    pub fn field_value(&mut self, ty: &TypeDescriptor) -> Result<Value> {
        let value = match classify(ty)? {
            Category::Object => Value::Object(Map::new()),
            Category::Primitive(kind) => kind.default_value(),
            Category::Normal(default) => default.clone(),
            Category::Array(element) => Value::Array(vec![self.field_value(element)?]),
            Category::ListLike(Some(item)) => Value::Array(vec![self.field_value(item)?]),
            Category::ListLike(None) => Value::Array(vec![Value::Object(Map::new())]),
            Category::MapLike(Some((key, val))) => {
                let key = map_key(self.field_value(key)?);
                let val = self.field_value(val)?;
                let mut entry = Map::new();
                entry.insert(key, val);
                Value::Object(entry)
            }
            Category::MapLike(None) => Value::Object(Map::new()),
            Category::UserType => {
                let provider = self.provider;
                let class = provider.resolve(ty)?;
                tracing::trace!(class = %class.name, depth = self.path.depth(), "expanding user type");
                Value::Object(self.build(class)?)
            }
        };
        Ok(value)
    }
}

/// JSON keys are strings: string defaults are used verbatim, anything else
/// by its compact JSON text.
fn map_key(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

// ------------------------------- Tests ------------------------------------ //
