//! AWS provider error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("aws CLI not found. Please install: https://aws.amazon.com/cli/")]
    CliNotFound,

    #[error("aws {command} failed: {stderr}")]
    CommandFailed { command: String, stderr: String },

    #[error("Unexpected response from aws {command}: {message}")]
    UnexpectedResponse { command: String, message: String },

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl AwsError {
    /// CLI sub-command the error came from
    pub fn operation(&self) -> &str {
        match self {
            Self::CommandFailed { command, .. } | Self::UnexpectedResponse { command, .. } => {
                command
            }
            Self::CliNotFound | Self::JsonError(_) | Self::IoError(_) => "aws",
        }
    }
}

impl From<AwsError> for chatanoo_cloud::CloudError {
    fn from(err: AwsError) -> Self {
        chatanoo_cloud::CloudError::provider(err.operation().to_string(), &err)
    }
}

pub type Result<T> = std::result::Result<T, AwsError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chatanoo_cloud::{CloudError, ErrorKind};

    #[test]
    fn test_converts_to_provider_error() {
        let err: CloudError = AwsError::CommandFailed {
            command: "s3api create-bucket".to_string(),
            stderr: "BucketAlreadyExists".to_string(),
        }
        .into();

        assert_eq!(err.kind(), ErrorKind::Provider);
        assert!(err.to_string().contains("s3api create-bucket"));
        assert!(err.to_string().contains("BucketAlreadyExists"));
    }
}
