use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::schema::Schema;

#[derive(Debug, Error)]
pub enum SchemaLoadError {
    #[error("failed to read schema file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("at JSON path {path} → {message}")]
    Parse { path: String, message: String },
}

/// Deserialize with JSON-path context in error messages.
pub fn from_str_with_path<T: DeserializeOwned>(src: &str) -> Result<T, SchemaLoadError> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| SchemaLoadError::Parse {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

pub fn from_slice_with_path<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SchemaLoadError> {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| SchemaLoadError::Parse {
        path: err.path().to_string(),
        message: err.into_inner().to_string(),
    })
}

pub fn load_schema_str(src: &str) -> Result<Schema, SchemaLoadError> {
    from_str_with_path(src)
}

pub fn load_schema_file(path: impl AsRef<Path>) -> Result<Schema, SchemaLoadError> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| SchemaLoadError::Io { path: path.to_path_buf(), source })?;
    from_slice_with_path(&bytes)
}

// ------------------------------- Tests ------------------------------------ //
