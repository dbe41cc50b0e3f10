//! Step reporting for resource operations

use serde::{Deserialize, Serialize};

/// Type of action performed by a completed step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// A resource was created
    Create,
    /// A resource was deleted
    Delete,
    /// A resource was disabled and left in place
    Disable,
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionType::Create => write!(f, "created"),
            ActionType::Delete => write!(f, "deleted"),
            ActionType::Disable => write!(f, "disabled"),
        }
    }
}

/// Kinds of resources tracked in an environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    HostedZone,
    Bucket,
    Distribution,
    DnsRecord,
    Role,
    Preset,
    Pipeline,
    Transcoder,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::HostedZone => write!(f, "hosted zone"),
            ResourceKind::Bucket => write!(f, "bucket"),
            ResourceKind::Distribution => write!(f, "distribution"),
            ResourceKind::DnsRecord => write!(f, "DNS record"),
            ResourceKind::Role => write!(f, "role"),
            ResourceKind::Preset => write!(f, "preset"),
            ResourceKind::Pipeline => write!(f, "pipeline"),
            ResourceKind::Transcoder => write!(f, "transcoder"),
        }
    }
}

/// One completed step of a resource operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub action: ActionType,
    pub resource: ResourceKind,
    /// Human-facing identifier of the resource (domain, bucket name, ...)
    pub target: String,
}

impl StepReport {
    pub fn new(action: ActionType, resource: ResourceKind, target: impl Into<String>) -> Self {
        Self {
            action,
            resource,
            target: target.into(),
        }
    }

    pub fn created(resource: ResourceKind, target: impl Into<String>) -> Self {
        Self::new(ActionType::Create, resource, target)
    }

    pub fn deleted(resource: ResourceKind, target: impl Into<String>) -> Self {
        Self::new(ActionType::Delete, resource, target)
    }

    pub fn disabled(resource: ResourceKind, target: impl Into<String>) -> Self {
        Self::new(ActionType::Disable, resource, target)
    }
}

impl std::fmt::Display for StepReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} {}", self.resource, self.target, self.action)
    }
}

/// Receives a status line for every completed step
pub trait Reporter: Send + Sync {
    fn step(&self, report: &StepReport);

    /// Something the operator must follow up on by hand
    fn warn(&self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_report_display() {
        let report = StepReport::created(ResourceKind::HostedZone, "example.com");
        assert_eq!(report.to_string(), "hosted zone example.com created");

        let report = StepReport::disabled(ResourceKind::Distribution, "E2ABC");
        assert_eq!(report.to_string(), "distribution E2ABC disabled");
    }
}
