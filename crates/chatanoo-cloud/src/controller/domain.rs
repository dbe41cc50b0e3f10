use super::DomainResource;
use crate::action::{Reporter, ResourceKind, StepReport};
use crate::error::{CloudError, Result};
use crate::naming;
use crate::provider::ZoneClient;
use crate::state::HostedZoneRecord;
use crate::store::EnvironmentHandle;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// Hosted zones
pub struct DomainController {
    env: EnvironmentHandle,
    zones: Arc<dyn ZoneClient>,
    reporter: Arc<dyn Reporter>,
}

impl DomainController {
    pub fn new(
        env: EnvironmentHandle,
        zones: Arc<dyn ZoneClient>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            env,
            zones,
            reporter,
        }
    }
}

#[async_trait]
impl DomainResource for DomainController {
    async fn create(&self, domain: &str) -> Result<HostedZoneRecord> {
        let env_name = self
            .env
            .read(|env| {
                if env.hosted_zone(domain).is_some() {
                    return Err(CloudError::already_exists(ResourceKind::HostedZone, domain));
                }
                Ok(env.name.clone())
            })
            .await?;

        let caller_reference = uuid::Uuid::new_v4().to_string();
        tracing::debug!("Creating hosted zone {} ({})", domain, caller_reference);

        let zone = self
            .zones
            .create_zone(&naming::fqdn(domain), &caller_reference)
            .await?;
        self.zones
            .tag_zone(&zone.id, &naming::resource_tags(&env_name, "hosting"))
            .await?;

        let record = HostedZoneRecord {
            domain: domain.to_string(),
            zone_id: zone.id,
            descriptor: zone.descriptor,
            created_at: Utc::now(),
        };
        self.env
            .update(|env| env.insert_hosted_zone(record.clone()))
            .await?;

        self.reporter
            .step(&StepReport::created(ResourceKind::HostedZone, domain));
        Ok(record)
    }

    async fn delete(&self, domain: &str) -> Result<()> {
        let zone_id = self
            .env
            .read(|env| env.hosted_zone(domain).map(|z| z.zone_id.clone()))
            .await
            .ok_or_else(|| CloudError::not_found(ResourceKind::HostedZone, domain))?;

        // The record stays when the provider refuses, so the delete can be retried
        self.zones.delete_zone(&zone_id).await?;

        self.env
            .update(|env| env.remove_hosted_zone(domain).map(|_| ()))
            .await?;

        self.reporter
            .step(&StepReport::deleted(ResourceKind::HostedZone, domain));
        Ok(())
    }
}
