//! Provider client facade
//!
//! One thin client per resource family. Implementations own authentication
//! and transport; the controllers only see these traits.

use crate::error::Result;
use crate::presets::PresetSpec;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// DNS zone management
#[async_trait]
pub trait ZoneClient: Send + Sync {
    /// Create a hosted zone for `name` (fully qualified)
    async fn create_zone(&self, name: &str, caller_reference: &str) -> Result<CreatedZone>;

    async fn delete_zone(&self, id: &str) -> Result<()>;

    async fn tag_zone(&self, id: &str, tags: &[Tag]) -> Result<()>;
}

/// Record sets inside a hosted zone
#[async_trait]
pub trait DnsClient: Send + Sync {
    async fn upsert_record(&self, zone_id: &str, record: &DnsRecord) -> Result<()>;

    async fn delete_record(&self, zone_id: &str, record: &DnsRecord) -> Result<()>;
}

/// Object storage buckets
#[async_trait]
pub trait StorageClient: Send + Sync {
    async fn create_bucket(&self, name: &str, options: &BucketOptions) -> Result<()>;

    async fn delete_bucket(&self, name: &str) -> Result<()>;

    async fn put_cors(&self, name: &str, rules: &[CorsRule]) -> Result<()>;

    async fn put_tags(&self, name: &str, tags: &[Tag]) -> Result<()>;
}

/// CDN distributions
#[async_trait]
pub trait CdnClient: Send + Sync {
    async fn create_distribution(&self, spec: &DistributionSpec) -> Result<DistributionInfo>;

    async fn get_distribution(&self, id: &str) -> Result<DistributionSnapshot>;

    async fn update_distribution(
        &self,
        id: &str,
        config: &DistributionConfig,
        etag: &str,
    ) -> Result<()>;
}

/// Roles and policies
#[async_trait]
pub trait IdentityClient: Send + Sync {
    /// Returns the policy ARN
    async fn create_policy(&self, name: &str, document: &str) -> Result<String>;

    /// Returns the role ARN
    async fn create_role(&self, name: &str, trust_document: &str) -> Result<String>;

    async fn attach_policy(&self, role_name: &str, policy_arn: &str) -> Result<()>;

    async fn detach_policy(&self, role_name: &str, policy_arn: &str) -> Result<()>;

    async fn delete_role(&self, role_name: &str) -> Result<()>;

    async fn delete_policy(&self, policy_arn: &str) -> Result<()>;
}

/// Transcoding presets and pipelines
#[async_trait]
pub trait TranscoderClient: Send + Sync {
    /// Returns the preset identifier
    async fn create_preset(&self, spec: &PresetSpec) -> Result<String>;

    async fn delete_preset(&self, id: &str) -> Result<()>;

    /// Returns the pipeline identifier
    async fn create_pipeline(&self, spec: &PipelineSpec) -> Result<String>;

    async fn delete_pipeline(&self, id: &str) -> Result<()>;
}

/// The full set of clients a command needs
#[derive(Clone)]
pub struct Providers {
    pub zones: Arc<dyn ZoneClient>,
    pub dns: Arc<dyn DnsClient>,
    pub storage: Arc<dyn StorageClient>,
    pub cdn: Arc<dyn CdnClient>,
    pub identity: Arc<dyn IdentityClient>,
    pub transcoder: Arc<dyn TranscoderClient>,
}

/// Resource tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Hosted zone returned by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedZone {
    /// Provider-assigned zone identifier
    pub id: String,

    /// Zone descriptor exactly as returned by the provider
    pub descriptor: serde_json::Value,
}

/// Canned access control for a new bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BucketAcl {
    PublicRead,
}

impl BucketAcl {
    pub fn as_str(&self) -> &'static str {
        match self {
            BucketAcl::PublicRead => "public-read",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketOptions {
    pub acl: BucketAcl,
    pub region: String,
}

/// Cross-origin rule for a bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CorsRule {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    pub expose_headers: Vec<String>,
}

impl CorsRule {
    /// Standard HTTP verbs from any origin
    pub fn permissive() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            allowed_methods: ["HEAD", "GET", "PUT", "POST", "DELETE"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
            allowed_headers: vec!["*".to_string()],
            expose_headers: vec!["ETag".to_string(), "x-amz-meta-custom-header".to_string()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewerProtocolPolicy {
    AllowAll,
}

impl ViewerProtocolPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewerProtocolPolicy::AllowAll => "allow-all",
        }
    }
}

/// Cache lifetimes in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtl {
    pub min: u64,
    pub default: u64,
    pub max: u64,
}

impl Default for CacheTtl {
    fn default() -> Self {
        Self {
            min: 0,
            default: 86_400,
            max: 31_536_000,
        }
    }
}

/// Distribution with a single bucket origin and a single alias
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistributionSpec {
    pub caller_reference: String,
    pub comment: String,
    pub alias: String,
    pub origin_id: String,
    pub origin_domain: String,
    pub enabled: bool,
    pub viewer_protocol_policy: ViewerProtocolPolicy,
    pub allowed_methods: Vec<String>,
    pub ttl: CacheTtl,
}

/// Identifiers assigned to a new distribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionInfo {
    pub id: String,
    /// Provider-assigned public host name
    pub domain_name: String,
}

/// Current configuration of a distribution as the provider stores it
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionConfig {
    pub enabled: bool,

    /// Full provider configuration, sent back unchanged apart from `enabled`
    pub document: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSnapshot {
    /// Concurrency token required by updates
    pub etag: String,
    pub config: DistributionConfig,
}

/// Record set used to alias a host name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub name: String,
    pub record_type: String,
    pub ttl: u32,
    pub value: String,
}

impl DnsRecord {
    pub fn cname(name: impl Into<String>, ttl: u32, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            record_type: "CNAME".to_string(),
            ttl,
            value: value.into(),
        }
    }
}

/// Transcoding pipeline bound to an input and output bucket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PipelineSpec {
    pub name: String,
    pub input_bucket: String,
    pub output_bucket: String,
    /// ARN of the role the pipeline runs as
    pub role: String,
}
