//! Front API: one conversion request from class name to JSON text.
use serde_json::{Map, Value};

use crate::catalog::MetadataProvider;
use crate::error::{ConvertError, Result};
use crate::model::ClassDescriptor;
use crate::schema::{SchemaBuilder, SchemaNode};
use crate::skeleton::SkeletonBuilder;

/// Generic notice for any failed conversion.
pub const FAILURE_MESSAGE: &str = "Convert to JSON failed.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    /// Example payload with default values.
    Skeleton,
    /// Schema with constraints and descriptions.
    Schema,
}

/// A finished conversion.
#[derive(Debug)]
pub struct Rendered {
    pub type_name: String,
    pub json: String,
}

impl Rendered {
    pub fn success_message(&self) -> String {
        format!("Convert {} to JSON success.", self.type_name)
    }
}

pub struct Converter<'p, P: ?Sized> {
    provider: &'p P,
}

impl<'p, P: MetadataProvider + ?Sized> Converter<'p, P> {
    pub fn new(provider: &'p P) -> Self { Self { provider } }

    fn class(&self, name: &str) -> Result<&'p ClassDescriptor> {
        let provider = self.provider;
        provider.class(name).ok_or_else(|| ConvertError::Resolution(name.to_string()))
    }

    pub fn skeleton(&self, class_name: &str) -> Result<Map<String, Value>> {
        let class = self.class(class_name)?;
        SkeletonBuilder::new(self.provider).build(class)
    }

    pub fn schema(&self, class_name: &str) -> Result<SchemaNode> {
        let class = self.class(class_name)?;
        SchemaBuilder::new(self.provider).build(class)
    }

    /// Build and pretty-print. Either the complete document comes back or
    /// an error does; there is no partial output.
    pub fn render(&self, target: Target, class_name: &str) -> Result<Rendered> {
        let _span = tracing::info_span!("convert", class = class_name, ?target).entered();
        tracing::info!("conversion started");
        let json = match target {
            Target::Skeleton => serde_json::to_string_pretty(&self.skeleton(class_name)?)?,
            Target::Schema => serde_json::to_string_pretty(&self.schema(class_name)?)?,
        };
        tracing::info!(bytes = json.len(), "conversion finished");
        Ok(Rendered { type_name: class_name.to_string(), json })
    }
}

// ------------------------------- Tests ------------------------------------ //
