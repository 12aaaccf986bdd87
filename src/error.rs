use thiserror::Error;

/// Everything that can abort a conversion.
///
/// A conversion is atomic: the first error ends it and no partial tree is
/// handed out.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A referenced type has no class definition in the provider.
    #[error("cannot resolve type `{0}` to a class definition")]
    Resolution(String),

    /// Recursion re-entered a class that is still being expanded.
    #[error("type `{class}` refers back to itself ({})", .path.join(" -> "))]
    StructuralExhaustion { class: String, path: Vec<String> },

    #[error("@{annotation}: attribute `{attribute}` is malformed: {reason}")]
    MalformedConstraint {
        annotation: String,
        attribute: String,
        reason: String,
    },

    #[error("malformed type expression `{0}`")]
    TypeSyntax(String),

    #[error("failed to load model `{source_name}`: {message}")]
    ModelLoad { source_name: String, message: String },

    #[error(transparent)]
    Serialize(#[from] serde_json::Error),
}

pub type Result<T, E = ConvertError> = std::result::Result<T, E>;
