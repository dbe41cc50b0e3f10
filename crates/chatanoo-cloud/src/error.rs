//! Provisioning error types

use crate::action::ResourceKind;
use thiserror::Error;

/// Provisioning errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("{resource} '{name}' not found in environment state")]
    NotFound { resource: ResourceKind, name: String },

    #[error("{resource} '{name}' requires {dependency} '{dependency_name}', which does not exist")]
    DependencyMissing {
        resource: ResourceKind,
        name: String,
        dependency: ResourceKind,
        dependency_name: String,
    },

    #[error("{resource} '{name}' is still used by {dependent} '{dependent_name}'")]
    InUse {
        resource: ResourceKind,
        name: String,
        dependent: ResourceKind,
        dependent_name: String,
    },

    #[error("{resource} '{name}' already exists in environment state")]
    AlreadyExists { resource: ResourceKind, name: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Provider call {operation} failed: {message}")]
    Provider { operation: String, message: String },

    #[error("Failed to delete {} preset(s): {}", .0.len(), describe_presets(.0))]
    Presets(Vec<PresetFailure>),

    #[error("Environment not found: {0}")]
    EnvironmentNotFound(String),

    #[error("Environment already exists: {0}")]
    EnvironmentExists(String),

    #[error("State file error: {0}")]
    StateError(String),

    #[error("{step} failed: {source}")]
    Step {
        step: String,
        #[source]
        source: Box<CloudError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] chatanoo_config::ConfigError),
}

/// Error categories callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced record is absent from the environment state
    NotFound,
    /// A prerequisite record is absent before a dependent create
    DependencyMissing,
    /// The record is already tracked
    AlreadyExists,
    /// Malformed user input, detected before any provider call
    InvalidInput,
    /// The remote call itself failed
    Provider,
    /// The environment document could not be read or written
    Persistence,
}

/// A preset whose deletion failed
#[derive(Debug, Clone)]
pub struct PresetFailure {
    pub preset_id: String,
    pub message: String,
}

fn describe_presets(failures: &[PresetFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{} ({})", f.preset_id, f.message))
        .collect::<Vec<_>>()
        .join(", ")
}

impl CloudError {
    pub fn not_found(resource: ResourceKind, name: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            name: name.into(),
        }
    }

    pub fn already_exists(resource: ResourceKind, name: impl Into<String>) -> Self {
        Self::AlreadyExists {
            resource,
            name: name.into(),
        }
    }

    pub fn dependency_missing(
        resource: ResourceKind,
        name: impl Into<String>,
        dependency: ResourceKind,
        dependency_name: impl Into<String>,
    ) -> Self {
        Self::DependencyMissing {
            resource,
            name: name.into(),
            dependency,
            dependency_name: dependency_name.into(),
        }
    }

    pub fn in_use(
        resource: ResourceKind,
        name: impl Into<String>,
        dependent: ResourceKind,
        dependent_name: impl Into<String>,
    ) -> Self {
        Self::InUse {
            resource,
            name: name.into(),
            dependent,
            dependent_name: dependent_name.into(),
        }
    }

    /// Failure reported by a provider client
    pub fn provider(operation: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Provider {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// Attach the name of the workflow step that failed
    pub fn in_step(self, step: impl Into<String>) -> Self {
        Self::Step {
            step: step.into(),
            source: Box::new(self),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } | Self::EnvironmentNotFound(_) => ErrorKind::NotFound,
            Self::DependencyMissing { .. } | Self::InUse { .. } => ErrorKind::DependencyMissing,
            Self::AlreadyExists { .. } | Self::EnvironmentExists(_) => ErrorKind::AlreadyExists,
            Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Provider { .. } | Self::Presets(_) => ErrorKind::Provider,
            Self::StateError(_) | Self::Io(_) | Self::Yaml(_) | Self::Config(_) => {
                ErrorKind::Persistence
            }
            Self::Step { source, .. } => source.kind(),
        }
    }

    /// The failing step, when raised from a workflow
    pub fn step(&self) -> Option<&str> {
        match self {
            Self::Step { step, .. } => Some(step),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, CloudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_follows_step_source() {
        let err = CloudError::provider("s3api create-bucket", "BucketAlreadyExists")
            .in_step("storage create medias-input");

        assert_eq!(err.kind(), ErrorKind::Provider);
        assert_eq!(err.step(), Some("storage create medias-input"));
        assert!(err.to_string().contains("BucketAlreadyExists"));
    }

    #[test]
    fn test_display_messages() {
        let err = CloudError::not_found(ResourceKind::Role, "transcoder");
        assert_eq!(
            err.to_string(),
            "role 'transcoder' not found in environment state"
        );

        let err = CloudError::dependency_missing(
            ResourceKind::DnsRecord,
            "cdn.example.com",
            ResourceKind::HostedZone,
            "example.com",
        );
        assert_eq!(err.kind(), ErrorKind::DependencyMissing);
        assert!(err.to_string().contains("hosted zone 'example.com'"));

        let err = CloudError::Presets(vec![PresetFailure {
            preset_id: "p-1".to_string(),
            message: "throttled".to_string(),
        }]);
        assert_eq!(err.to_string(), "Failed to delete 1 preset(s): p-1 (throttled)");
    }
}
