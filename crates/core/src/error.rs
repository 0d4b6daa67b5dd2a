use crate::validation::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum RxError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("index {index} is out of range for a list of {len} entries")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("prescription failed validation: {0}")]
    Validation(ValidationErrors),

    #[error("codec error: {0}")]
    Codec(#[from] rx_codec::CodecError),
    #[error("invalid text: {0}")]
    Text(#[from] rx_types::TextError),

    #[error("invalid username for profile storage: {0:?}")]
    InvalidUsername(String),
    #[error("failed to create profile directory: {0}")]
    ProfileDirCreation(std::io::Error),
    #[error("failed to read profile file: {0}")]
    FileRead(std::io::Error),
    #[error("failed to write profile file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to serialize YAML: {0}")]
    YamlSerialization(serde_yaml::Error),
    #[error("failed to deserialize YAML: {0}")]
    YamlDeserialization(serde_yaml::Error),
    #[error("profile store lock poisoned")]
    LockPoisoned,
}

pub type RxResult<T> = std::result::Result<T, RxError>;
