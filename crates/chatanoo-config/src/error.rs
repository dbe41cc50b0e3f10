use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("home directory not found; set CHATANOO_HOME to choose where environments live")]
    HomeDirNotFound,

    #[error("invalid environment name '{0}': use lowercase letters, digits and '-'")]
    InvalidEnvironmentName(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
