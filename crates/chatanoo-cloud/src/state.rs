//! Persisted environment model
//!
//! An [`Environment`] is the single document describing everything this tool
//! created for one environment. Controllers go through the typed mutators
//! below, which enforce the per-record invariants.

use crate::action::ResourceKind;
use crate::error::{CloudError, Result};
use crate::presets::PresetKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const STATE_VERSION: u32 = 1;

fn current_version() -> u32 {
    STATE_VERSION
}

/// Cloud account credentials for one environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

impl Credentials {
    /// Access key id with all but the last four characters hidden
    pub fn masked_access_key(&self) -> String {
        let visible: String = self
            .access_key_id
            .chars()
            .rev()
            .take(4)
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        let hidden = self.access_key_id.chars().count().saturating_sub(4);
        format!("{}{}", "*".repeat(hidden), visible)
    }
}

/// Root document for one environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    #[serde(default = "current_version")]
    pub version: u32,

    pub name: String,

    pub credentials: Credentials,

    /// Domain served by this environment
    pub domain: String,

    /// Hosted zones keyed by domain name
    #[serde(default)]
    pub hosted_zones: BTreeMap<String, HostedZoneRecord>,

    /// Buckets keyed by logical name
    #[serde(default)]
    pub buckets: BTreeMap<String, BucketRecord>,

    /// Active distributions keyed by domain, then logical name
    #[serde(default)]
    pub distributions: BTreeMap<String, BTreeMap<String, DistributionRecord>>,

    /// Disabled distributions awaiting manual deletion
    #[serde(default)]
    pub retired_distributions: Vec<DistributionRecord>,

    /// Role/policy pairs keyed by logical name
    #[serde(default)]
    pub roles: BTreeMap<String, RoleRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transcoder: Option<TranscoderState>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

/// DNS zone created for a domain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostedZoneRecord {
    pub domain: String,
    pub zone_id: String,
    /// Provider descriptor, kept verbatim
    #[serde(default)]
    pub descriptor: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketRecord {
    pub logical_name: String,
    /// Globally unique provider-side name
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionStatus {
    Enabled,
    Disabled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DistributionRecord {
    pub domain: String,
    pub logical_name: String,
    pub id: String,
    /// Provider-assigned host name the alias points at
    pub domain_name: String,
    pub alias: String,
    pub status: DistributionStatus,
    /// The alias CNAME has been written to the hosted zone
    #[serde(default)]
    pub dns_record: bool,
    pub created_at: DateTime<Utc>,
}

impl DistributionRecord {
    /// Every step of an aliased storage create has completed
    pub fn is_serving(&self) -> bool {
        self.status == DistributionStatus::Enabled && self.dns_record
    }
}

/// Role and its policy, always tracked together
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRecord {
    pub name: String,
    pub role_name: String,
    pub role_arn: String,
    pub policy_arn: String,
    pub created_at: DateTime<Utc>,
}

/// Transcoding pipeline and its presets
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscoderState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pipeline: Option<String>,

    #[serde(default)]
    pub presets: BTreeMap<PresetKind, String>,
}

impl TranscoderState {
    /// Both the pipeline and every preset exist
    pub fn is_complete(&self) -> bool {
        self.pipeline.is_some() && PresetKind::ALL.iter().all(|k| self.presets.contains_key(k))
    }

    pub fn is_empty(&self) -> bool {
        self.pipeline.is_none() && self.presets.is_empty()
    }
}

impl Environment {
    pub fn new(name: impl Into<String>, credentials: Credentials, domain: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            version: STATE_VERSION,
            name: name.into(),
            credentials,
            domain: domain.into(),
            hosted_zones: BTreeMap::new(),
            buckets: BTreeMap::new(),
            distributions: BTreeMap::new(),
            retired_distributions: Vec::new(),
            roles: BTreeMap::new(),
            transcoder: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // ========== Hosted zones ==========

    pub fn hosted_zone(&self, domain: &str) -> Option<&HostedZoneRecord> {
        self.hosted_zones.get(domain)
    }

    pub fn insert_hosted_zone(&mut self, record: HostedZoneRecord) -> Result<()> {
        if self.hosted_zones.contains_key(&record.domain) {
            return Err(CloudError::already_exists(
                ResourceKind::HostedZone,
                &record.domain,
            ));
        }
        self.hosted_zones.insert(record.domain.clone(), record);
        Ok(())
    }

    pub fn remove_hosted_zone(&mut self, domain: &str) -> Result<HostedZoneRecord> {
        self.hosted_zones
            .remove(domain)
            .ok_or_else(|| CloudError::not_found(ResourceKind::HostedZone, domain))
    }

    // ========== Buckets ==========

    pub fn bucket(&self, logical_name: &str) -> Option<&BucketRecord> {
        self.buckets.get(logical_name)
    }

    pub fn insert_bucket(&mut self, record: BucketRecord) -> Result<()> {
        if self.buckets.contains_key(&record.logical_name) {
            return Err(CloudError::already_exists(
                ResourceKind::Bucket,
                &record.logical_name,
            ));
        }
        self.buckets.insert(record.logical_name.clone(), record);
        Ok(())
    }

    pub fn remove_bucket(&mut self, logical_name: &str) -> Result<BucketRecord> {
        self.buckets
            .remove(logical_name)
            .ok_or_else(|| CloudError::not_found(ResourceKind::Bucket, logical_name))
    }

    // ========== Distributions ==========

    pub fn distribution(&self, domain: &str, logical_name: &str) -> Option<&DistributionRecord> {
        self.distributions.get(domain)?.get(logical_name)
    }

    /// Disabled distribution previously serving `logical_name` on `domain`
    pub fn retired_distribution(
        &self,
        domain: &str,
        logical_name: &str,
    ) -> Option<&DistributionRecord> {
        self.retired_distributions
            .iter()
            .rev()
            .find(|d| d.domain == domain && d.logical_name == logical_name)
    }

    pub fn insert_distribution(&mut self, record: DistributionRecord) -> Result<()> {
        let by_name = self.distributions.entry(record.domain.clone()).or_default();
        if by_name.contains_key(&record.logical_name) {
            return Err(CloudError::already_exists(
                ResourceKind::Distribution,
                &record.alias,
            ));
        }
        by_name.insert(record.logical_name.clone(), record);
        Ok(())
    }

    pub fn set_distribution_status(
        &mut self,
        domain: &str,
        logical_name: &str,
        status: DistributionStatus,
    ) -> Result<()> {
        let record = self
            .distributions
            .get_mut(domain)
            .and_then(|by_name| by_name.get_mut(logical_name))
            .ok_or_else(|| {
                CloudError::not_found(
                    ResourceKind::Distribution,
                    format!("{}.{}", logical_name, domain),
                )
            })?;
        record.status = status;
        Ok(())
    }

    /// Record that the alias CNAME was written or removed
    pub fn set_distribution_dns_record(
        &mut self,
        domain: &str,
        logical_name: &str,
        written: bool,
    ) -> Result<()> {
        let record = self
            .distributions
            .get_mut(domain)
            .and_then(|by_name| by_name.get_mut(logical_name))
            .ok_or_else(|| {
                CloudError::not_found(
                    ResourceKind::Distribution,
                    format!("{}.{}", logical_name, domain),
                )
            })?;
        record.dns_record = written;
        Ok(())
    }

    /// Active distribution for `logical_name` on any domain
    pub fn distribution_for_bucket(&self, logical_name: &str) -> Option<&DistributionRecord> {
        self.distributions
            .values()
            .find_map(|by_name| by_name.get(logical_name))
    }

    /// Bucket exists and, when `domain` is given, is served on it
    pub fn storage_ready(&self, logical_name: &str, domain: Option<&str>) -> bool {
        self.bucket(logical_name).is_some()
            && domain.is_none_or(|domain| {
                self.distribution(domain, logical_name)
                    .is_some_and(DistributionRecord::is_serving)
            })
    }

    /// Move a distribution out of the active set, marking it disabled
    pub fn retire_distribution(
        &mut self,
        domain: &str,
        logical_name: &str,
    ) -> Result<DistributionRecord> {
        let by_name = self.distributions.get_mut(domain);
        let mut record = by_name
            .and_then(|by_name| by_name.remove(logical_name))
            .ok_or_else(|| {
                CloudError::not_found(
                    ResourceKind::Distribution,
                    format!("{}.{}", logical_name, domain),
                )
            })?;

        if self.distributions.get(domain).is_some_and(|m| m.is_empty()) {
            self.distributions.remove(domain);
        }

        record.status = DistributionStatus::Disabled;
        self.retired_distributions.push(record.clone());
        Ok(record)
    }

    // ========== Roles ==========

    pub fn role(&self, name: &str) -> Option<&RoleRecord> {
        self.roles.get(name)
    }

    pub fn insert_role(&mut self, record: RoleRecord) -> Result<()> {
        if self.roles.contains_key(&record.name) {
            return Err(CloudError::already_exists(ResourceKind::Role, &record.name));
        }
        self.roles.insert(record.name.clone(), record);
        Ok(())
    }

    pub fn remove_role(&mut self, name: &str) -> Result<RoleRecord> {
        self.roles
            .remove(name)
            .ok_or_else(|| CloudError::not_found(ResourceKind::Role, name))
    }

    // ========== Transcoder ==========

    pub fn transcoder(&self) -> Option<&TranscoderState> {
        self.transcoder.as_ref()
    }

    pub fn insert_preset(&mut self, kind: PresetKind, id: impl Into<String>) {
        self.transcoder
            .get_or_insert_with(TranscoderState::default)
            .presets
            .insert(kind, id.into());
    }

    pub fn remove_preset(&mut self, kind: PresetKind) -> Option<String> {
        let removed = self.transcoder.as_mut()?.presets.remove(&kind);
        self.prune_transcoder();
        removed
    }

    pub fn set_pipeline(&mut self, id: impl Into<String>) -> Result<()> {
        let state = self.transcoder.get_or_insert_with(TranscoderState::default);
        if let Some(existing) = &state.pipeline {
            return Err(CloudError::already_exists(ResourceKind::Pipeline, existing));
        }
        state.pipeline = Some(id.into());
        Ok(())
    }

    pub fn clear_pipeline(&mut self) -> Option<String> {
        let removed = self.transcoder.as_mut()?.pipeline.take();
        self.prune_transcoder();
        removed
    }

    fn prune_transcoder(&mut self) {
        if self.transcoder.as_ref().is_some_and(|t| t.is_empty()) {
            self.transcoder = None;
        }
    }
}
