use serde::de::DeserializeOwned;

use crate::error::{ConvertError, Result};

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(source_name: &str, src: &str) -> Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| load_error(source_name, err))
}

fn load_error(source_name: &str, err: serde_path_to_error::Error<serde_json::Error>) -> ConvertError {
    let path = err.path().to_string();
    ConvertError::ModelLoad {
        source_name: source_name.to_string(),
        message: format!("at JSON path {path} → {}", err.into_inner()),
    }
}
