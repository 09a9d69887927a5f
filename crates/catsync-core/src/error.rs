use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read exclusions file {path}: {source}")]
    ExclusionsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse exclusions file: {0}")]
    ExclusionsFileParse(#[from] serde_yaml::Error),

    #[error("invalid exclusions: {0}")]
    Validation(String),
}
