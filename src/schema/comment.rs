use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::FieldDescriptor;

// literal patterns; compiling them cannot fail
static DOC_DELIMITERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[/*]").expect("doc delimiter pattern"));
static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*//+(.*)$").expect("line comment pattern"));

/// Free-text description of a field.
///
/// A non-empty doc comment wins, with every `/` and `*` removed. Otherwise the
/// `//` comments found in the field's source text are joined with spaces.
/// No comment at all gives an empty string, never an absent description.
pub fn description(field: &FieldDescriptor) -> String {
    if let Some(doc) = field.doc.as_deref().filter(|d| !d.is_empty()) {
        return DOC_DELIMITERS.replace_all(doc, "").trim().to_string();
    }

    let Some(text) = field.text.as_deref() else { return String::new() };
    text.lines()
        .filter_map(|line| LINE_COMMENT.captures(line))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
