use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClissoError {
    #[error("No app specified and no default app configured")]
    NoAppSpecified,

    #[error("Could not get provider for app '{0}'")]
    ProviderNotConfigured(String),

    #[error("Could not get provider type for provider '{0}'")]
    ProviderTypeNotConfigured(String),

    #[error("Unsupported identity provider type '{provider_type}' for app '{app}'")]
    UnsupportedProviderType { provider_type: String, app: String },

    #[error("App not found: {0}")]
    AppNotFound(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Error reading {what} from terminal: {reason}")]
    Prompt { what: String, reason: String },

    #[error("Could not get temporary credentials: {0}")]
    Exchange(String),

    #[error("Error processing credentials: {0}")]
    Delivery(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClissoError {
    /// Return a typed exit code for this error category.
    pub fn exit_code(&self) -> i32 {
        match self {
            ClissoError::NoAppSpecified => 3,
            ClissoError::ProviderNotConfigured(_) => 3,
            ClissoError::ProviderTypeNotConfigured(_) => 3,
            ClissoError::UnsupportedProviderType { .. } => 4,
            ClissoError::AppNotFound(_) => 3,
            ClissoError::InvalidConfig(_) => 3,
            ClissoError::Prompt { .. } => 2,
            ClissoError::Exchange(_) => 5,
            ClissoError::Delivery(_) => 6,
            ClissoError::Serialization(_) => 1,
            ClissoError::Io(_) => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClissoError>;
