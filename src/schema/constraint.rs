//! Bean-validation annotations → schema constraints.
//!
//! Rules are looked up by (node type, annotation simple name). Annotations
//! outside the validation namespaces, or with no rule for the node's type,
//! are ignored. Rules run in declaration order, so a repeated annotation
//! overwrites what an earlier one set.
use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::Number;

use crate::error::{ConvertError, Result};
use crate::model::{Annotation, AttrValue, FieldDescriptor};
use super::{SchemaNode, SchemaType};

pub const NAMESPACES: [&str; 2] = ["javax.validation.constraints", "jakarta.validation.constraints"];

// `@Size` attribute defaults
const SIZE_MIN: i64 = 0;
const SIZE_MAX: i64 = i32::MAX as i64;

/// Applies the annotation to the node; returns whether it makes the field required.
type Rule = fn(&mut SchemaNode, &Annotation) -> Result<bool>;

static RULES: Lazy<HashMap<(SchemaType, &'static str), Rule>> = Lazy::new(|| {
    let mut rules: HashMap<(SchemaType, &'static str), Rule> = HashMap::new();

    rules.insert((SchemaType::String, "NotNull"), not_null);
    rules.insert((SchemaType::String, "NotBlank"), not_blank);
    rules.insert((SchemaType::String, "Pattern"), pattern);
    rules.insert((SchemaType::String, "Size"), size);

    for ty in [SchemaType::Integer, SchemaType::Number] {
        rules.insert((ty, "NotNull"), not_null);
        rules.insert((ty, "Min"), min);
        rules.insert((ty, "Max"), max);
        rules.insert((ty, "Positive"), positive);
        rules.insert((ty, "PositiveOrZero"), positive_or_zero);
        rules.insert((ty, "Negative"), negative);
        rules.insert((ty, "NegativeOrZero"), negative_or_zero);
    }

    rules.insert((SchemaType::Number, "DecimalMin"), decimal_min);
    rules.insert((SchemaType::Number, "DecimalMax"), decimal_max);
    rules
});

/// Mutates `node` according to the field's annotations and reports whether
/// the field is required.
pub fn apply(node: &mut SchemaNode, field: &FieldDescriptor) -> Result<bool> {
    let mut required = false;
    for ann in &field.annotations {
        if !NAMESPACES.contains(&ann.namespace()) {
            tracing::debug!(field = %field.name, annotation = %ann.name, "ignoring non-validation annotation");
            continue;
        }
        match RULES.get(&(node.ty, ann.simple_name())) {
            Some(rule) => required |= rule(node, ann)?,
            None => {
                tracing::debug!(field = %field.name, annotation = %ann.name, ty = node.ty.as_str(), "no rule for annotation on this type");
            }
        }
    }
    Ok(required)
}

// -------------------------------- Rules ---------------------------------- //

fn not_null(_: &mut SchemaNode, _: &Annotation) -> Result<bool> { Ok(true) }

fn not_blank(node: &mut SchemaNode, _: &Annotation) -> Result<bool> {
    node.min_length = Some(1);
    Ok(true)
}

fn pattern(node: &mut SchemaNode, ann: &Annotation) -> Result<bool> {
    if let Some(regexp) = str_attr(ann, "regexp")?.filter(|r| !r.is_empty()) {
        node.pattern = Some(regexp.to_string());
    }
    Ok(false)
}

fn size(node: &mut SchemaNode, ann: &Annotation) -> Result<bool> {
    node.min_length = Some(int_attr(ann, "min")?.unwrap_or(SIZE_MIN));
    node.max_length = Some(int_attr(ann, "max")?.unwrap_or(SIZE_MAX));
    Ok(false)
}

fn min(node: &mut SchemaNode, ann: &Annotation) -> Result<bool> {
    let v = required_int(ann, "value")?;
    node.minimum = Some(integral_bound(node.ty, v));
    Ok(false)
}

fn max(node: &mut SchemaNode, ann: &Annotation) -> Result<bool> {
    let v = required_int(ann, "value")?;
    node.maximum = Some(integral_bound(node.ty, v));
    Ok(false)
}

fn positive(node: &mut SchemaNode, _: &Annotation) -> Result<bool> {
    node.minimum = Some(Number::from(0));
    node.exclusive_minimum = Some(true);
    Ok(false)
}

fn positive_or_zero(node: &mut SchemaNode, _: &Annotation) -> Result<bool> {
    node.minimum = Some(Number::from(0));
    Ok(false)
}

fn negative(node: &mut SchemaNode, _: &Annotation) -> Result<bool> {
    node.maximum = Some(Number::from(0));
    node.exclusive_maximum = Some(true);
    Ok(false)
}

fn negative_or_zero(node: &mut SchemaNode, _: &Annotation) -> Result<bool> {
    node.maximum = Some(Number::from(0));
    Ok(false)
}

fn decimal_min(node: &mut SchemaNode, ann: &Annotation) -> Result<bool> {
    node.minimum = Some(decimal_value(ann)?);
    if !bool_attr(ann, "inclusive")?.unwrap_or(true) {
        node.exclusive_minimum = Some(true);
    }
    Ok(false)
}

fn decimal_max(node: &mut SchemaNode, ann: &Annotation) -> Result<bool> {
    node.maximum = Some(decimal_value(ann)?);
    if !bool_attr(ann, "inclusive")?.unwrap_or(true) {
        node.exclusive_maximum = Some(true);
    }
    Ok(false)
}

// ------------------------------- Helpers --------------------------------- //

/// Integer nodes keep integer bounds; number nodes get them as floats.
fn integral_bound(ty: SchemaType, v: i64) -> Number {
    match ty {
        SchemaType::Number => Number::from_f64(v as f64).unwrap_or_else(|| Number::from(v)),
        _ => Number::from(v),
    }
}

fn decimal_value(ann: &Annotation) -> Result<Number> {
    let raw = str_attr(ann, "value")?.ok_or_else(|| malformed(ann, "value", "missing"))?;
    raw.trim()
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .ok_or_else(|| malformed(ann, "value", &format!("`{raw}` is not a finite decimal")))
}

fn required_int(ann: &Annotation, key: &str) -> Result<i64> {
    int_attr(ann, key)?.ok_or_else(|| malformed(ann, key, "missing"))
}

fn int_attr(ann: &Annotation, key: &str) -> Result<Option<i64>> {
    match ann.attr(key) {
        None => Ok(None),
        Some(AttrValue::Int(v)) => Ok(Some(*v)),
        Some(other) => Err(wrong_kind(ann, key, "integer", other)),
    }
}

fn str_attr<'a>(ann: &'a Annotation, key: &str) -> Result<Option<&'a str>> {
    match ann.attr(key) {
        None => Ok(None),
        Some(AttrValue::Str(v)) => Ok(Some(v.as_str())),
        Some(other) => Err(wrong_kind(ann, key, "string", other)),
    }
}

fn bool_attr(ann: &Annotation, key: &str) -> Result<Option<bool>> {
    match ann.attr(key) {
        None => Ok(None),
        Some(AttrValue::Bool(v)) => Ok(Some(*v)),
        Some(other) => Err(wrong_kind(ann, key, "boolean", other)),
    }
}

fn wrong_kind(ann: &Annotation, key: &str, expected: &str, got: &AttrValue) -> ConvertError {
    malformed(ann, key, &format!("expected {expected}, found {}", got.kind()))
}

fn malformed(ann: &Annotation, key: &str, reason: &str) -> ConvertError {
    ConvertError::MalformedConstraint {
        annotation: ann.simple_name().to_string(),
        attribute: key.to_string(),
        reason: reason.to_string(),
    }
}

// ------------------------------- Tests ------------------------------------ //
