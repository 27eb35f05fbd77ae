// File: src/error.rs
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProfileError>;

#[derive(Debug, Error)]
pub enum ProfileError {
    /// A duration field was not in `HH:MM:SS` form.
    #[error("could not parse {field} '{value}' as HH:MM:SS")]
    Parse { field: &'static str, value: String },

    /// The recipe has nothing to vectorize for this field.
    #[error("recipe has no {field}")]
    EmptyInput { field: &'static str },

    #[error("dictionary holds {dictionary_len} tokens but its vector has {vector_len} values")]
    DictionaryInvariant {
        dictionary_len: usize,
        vector_len: usize,
    },

    #[error("token '{0}' appears more than once in a dictionary")]
    DuplicateToken(String),

    #[error("recipe group has no recipes")]
    EmptyGroup,

    #[error("group index {index} is not valid for a profile with {len} groups")]
    GroupIndex { index: usize, len: usize },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] bincode::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
