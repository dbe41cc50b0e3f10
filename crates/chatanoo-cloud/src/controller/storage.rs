use super::StorageResource;
use crate::action::{Reporter, ResourceKind, StepReport};
use crate::error::{CloudError, Result};
use crate::naming;
use crate::provider::{
    BucketAcl, BucketOptions, CacheTtl, CdnClient, CorsRule, DistributionSpec, DnsClient,
    DnsRecord, StorageClient, ViewerProtocolPolicy,
};
use crate::state::{BucketRecord, DistributionRecord, DistributionStatus, Environment};
use crate::store::EnvironmentHandle;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// Records produced by a storage create
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageOutcome {
    pub bucket: BucketRecord,
    pub distribution: Option<DistributionRecord>,
}

/// Buckets and the CDN aliases in front of them
pub struct StorageController {
    env: EnvironmentHandle,
    storage: Arc<dyn StorageClient>,
    cdn: Arc<dyn CdnClient>,
    dns: Arc<dyn DnsClient>,
    reporter: Arc<dyn Reporter>,
}

/// Steps a create still has to run, resolved before any call
struct CreatePlan {
    env_name: String,
    region: String,
    bucket: Option<BucketRecord>,
    alias: Option<AliasPlan>,
}

struct AliasPlan {
    domain: String,
    zone_id: String,
    /// Distribution left by an earlier run whose alias was never written
    distribution: Option<DistributionRecord>,
}

/// What a delete has to do on the CDN side, resolved before any call
enum CdnTeardown {
    None,
    /// The distribution and alias were already handled by an earlier run
    AlreadyRetired,
    Active {
        zone_id: Option<String>,
        distribution: DistributionRecord,
    },
}

impl StorageController {
    pub fn new(
        env: EnvironmentHandle,
        storage: Arc<dyn StorageClient>,
        cdn: Arc<dyn CdnClient>,
        dns: Arc<dyn DnsClient>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            env,
            storage,
            cdn,
            dns,
            reporter,
        }
    }

    async fn create_bucket(&self, env_name: &str, region: &str, logical_name: &str) -> Result<BucketRecord> {
        let name = naming::bucket_name(env_name, logical_name);
        let options = BucketOptions {
            acl: BucketAcl::PublicRead,
            region: region.to_string(),
        };

        self.storage.create_bucket(&name, &options).await?;
        self.storage
            .put_cors(&name, &[CorsRule::permissive()])
            .await?;
        self.storage
            .put_tags(&name, &naming::resource_tags(env_name, "cdn"))
            .await?;

        let record = BucketRecord {
            logical_name: logical_name.to_string(),
            name,
            created_at: Utc::now(),
        };
        self.env
            .update(|env| env.insert_bucket(record.clone()))
            .await?;

        self.reporter
            .step(&StepReport::created(ResourceKind::Bucket, &record.name));
        Ok(record)
    }

    async fn create_distribution(
        &self,
        bucket: &BucketRecord,
        domain: &str,
    ) -> Result<DistributionRecord> {
        let alias = naming::alias(&bucket.logical_name, domain);
        let spec = DistributionSpec {
            caller_reference: uuid::Uuid::new_v4().to_string(),
            comment: format!("CloudFront Distribution for {} s3 bucket", bucket.name),
            alias: alias.clone(),
            origin_id: naming::origin_id(&bucket.name),
            origin_domain: naming::origin_domain(&bucket.name),
            enabled: true,
            viewer_protocol_policy: ViewerProtocolPolicy::AllowAll,
            allowed_methods: vec!["GET".to_string(), "HEAD".to_string()],
            ttl: CacheTtl::default(),
        };

        let info = self.cdn.create_distribution(&spec).await?;

        let record = DistributionRecord {
            domain: domain.to_string(),
            logical_name: bucket.logical_name.clone(),
            id: info.id,
            domain_name: info.domain_name,
            alias,
            status: DistributionStatus::Enabled,
            dns_record: false,
            created_at: Utc::now(),
        };
        self.env
            .update(|env| env.insert_distribution(record.clone()))
            .await?;

        self.reporter.step(&StepReport::created(
            ResourceKind::Distribution,
            format!("{} ({})", record.alias, record.id),
        ));
        Ok(record)
    }

    async fn disable_distribution(&self, distribution: &DistributionRecord) -> Result<()> {
        if distribution.status == DistributionStatus::Enabled {
            let snapshot = self.cdn.get_distribution(&distribution.id).await?;
            let mut config = snapshot.config;
            config.enabled = false;
            self.cdn
                .update_distribution(&distribution.id, &config, &snapshot.etag)
                .await?;

            self.env
                .update(|env| {
                    env.set_distribution_status(
                        &distribution.domain,
                        &distribution.logical_name,
                        DistributionStatus::Disabled,
                    )
                })
                .await?;
            self.reporter
                .step(&StepReport::disabled(ResourceKind::Distribution, &distribution.id));
        }

        // Providers need the disable to propagate before a distribution can be
        // destroyed, so the hard delete is left to the operator.
        let message = format!(
            "CloudFront distribution {} ({}) is disabled but not deleted; delete it from the AWS console once it is deployed",
            distribution.id, distribution.alias
        );
        tracing::warn!("{}", message);
        self.reporter.warn(&message);
        Ok(())
    }

    fn alias_record(distribution: &DistributionRecord) -> DnsRecord {
        DnsRecord::cname(
            naming::fqdn(&distribution.alias),
            naming::DNS_RECORD_TTL,
            &distribution.domain_name,
        )
    }

    fn plan_create(
        env: &Environment,
        logical_name: &str,
        domain: Option<&str>,
    ) -> Result<CreatePlan> {
        let bucket = env.bucket(logical_name).cloned();

        let alias = match domain {
            None => {
                if bucket.is_some() {
                    return Err(CloudError::already_exists(ResourceKind::Bucket, logical_name));
                }
                None
            }
            Some(domain) => {
                let distribution = env.distribution(domain, logical_name).cloned();
                if let Some(existing) = &distribution {
                    if existing.is_serving() {
                        return Err(CloudError::already_exists(
                            ResourceKind::Distribution,
                            &existing.alias,
                        ));
                    }
                    if existing.status == DistributionStatus::Disabled {
                        return Err(CloudError::InvalidInput(format!(
                            "distribution {} for '{}' is disabled; finish deleting storage '{}' first",
                            existing.id, existing.alias, logical_name
                        )));
                    }
                }

                let zone = env.hosted_zone(domain).ok_or_else(|| {
                    CloudError::dependency_missing(
                        ResourceKind::DnsRecord,
                        naming::alias(logical_name, domain),
                        ResourceKind::HostedZone,
                        domain,
                    )
                })?;
                Some(AliasPlan {
                    domain: domain.to_string(),
                    zone_id: zone.zone_id.clone(),
                    distribution,
                })
            }
        };

        Ok(CreatePlan {
            env_name: env.name.clone(),
            region: env.credentials.region.clone(),
            bucket,
            alias,
        })
    }

    fn plan_delete(
        env: &Environment,
        logical_name: &str,
        domain: Option<&str>,
    ) -> Result<(BucketRecord, CdnTeardown)> {
        let bucket = env
            .bucket(logical_name)
            .cloned()
            .ok_or_else(|| CloudError::not_found(ResourceKind::Bucket, logical_name))?;

        let Some(domain) = domain else {
            if let Some(distribution) = env.distribution_for_bucket(logical_name) {
                return Err(CloudError::in_use(
                    ResourceKind::Bucket,
                    logical_name,
                    ResourceKind::Distribution,
                    &distribution.alias,
                ));
            }
            return Ok((bucket, CdnTeardown::None));
        };

        let teardown = match env.distribution(domain, logical_name) {
            Some(distribution) => {
                let zone_id = if distribution.dns_record {
                    let zone = env.hosted_zone(domain).ok_or_else(|| {
                        CloudError::dependency_missing(
                            ResourceKind::DnsRecord,
                            &distribution.alias,
                            ResourceKind::HostedZone,
                            domain,
                        )
                    })?;
                    Some(zone.zone_id.clone())
                } else {
                    None
                };
                CdnTeardown::Active {
                    zone_id,
                    distribution: distribution.clone(),
                }
            }
            None => match env.retired_distribution(domain, logical_name) {
                Some(retired) if retired.created_at >= bucket.created_at => {
                    CdnTeardown::AlreadyRetired
                }
                _ => {
                    return Err(CloudError::not_found(
                        ResourceKind::Distribution,
                        naming::alias(logical_name, domain),
                    ));
                }
            },
        };
        Ok((bucket, teardown))
    }
}

#[async_trait]
impl StorageResource for StorageController {
    async fn create(&self, logical_name: &str, domain: Option<&str>) -> Result<StorageOutcome> {
        let plan = self
            .env
            .read(|env| Self::plan_create(env, logical_name, domain))
            .await?;

        let bucket = match plan.bucket {
            Some(bucket) => {
                tracing::debug!("Bucket {} already exists, skipping", bucket.name);
                bucket
            }
            None => {
                self.create_bucket(&plan.env_name, &plan.region, logical_name)
                    .await?
            }
        };

        let distribution = match plan.alias {
            None => None,
            Some(alias) => {
                let mut distribution = match alias.distribution {
                    Some(distribution) => {
                        tracing::debug!("Reusing distribution {}", distribution.id);
                        distribution
                    }
                    None => self.create_distribution(&bucket, &alias.domain).await?,
                };

                self.dns
                    .upsert_record(&alias.zone_id, &Self::alias_record(&distribution))
                    .await?;
                self.env
                    .update(|env| {
                        env.set_distribution_dns_record(&alias.domain, logical_name, true)
                    })
                    .await?;
                distribution.dns_record = true;
                self.reporter
                    .step(&StepReport::created(ResourceKind::DnsRecord, &distribution.alias));

                Some(distribution)
            }
        };

        Ok(StorageOutcome {
            bucket,
            distribution,
        })
    }

    async fn delete(&self, logical_name: &str, domain: Option<&str>) -> Result<()> {
        let (bucket, teardown) = self
            .env
            .read(|env| Self::plan_delete(env, logical_name, domain))
            .await?;

        match teardown {
            CdnTeardown::Active {
                zone_id,
                distribution,
            } => {
                self.disable_distribution(&distribution).await?;

                match zone_id {
                    Some(zone_id) => {
                        self.dns
                            .delete_record(&zone_id, &Self::alias_record(&distribution))
                            .await?;
                        self.reporter.step(&StepReport::deleted(
                            ResourceKind::DnsRecord,
                            &distribution.alias,
                        ));
                    }
                    None => {
                        tracing::debug!("Alias {} was never written", distribution.alias);
                    }
                }

                self.env
                    .update(|env| {
                        env.retire_distribution(&distribution.domain, &distribution.logical_name)
                            .map(|_| ())
                    })
                    .await?;
            }
            CdnTeardown::AlreadyRetired => {
                tracing::debug!("CDN alias for {} already removed", logical_name);
            }
            CdnTeardown::None => {}
        }

        self.storage.delete_bucket(&bucket.name).await?;
        self.env
            .update(|env| env.remove_bucket(logical_name).map(|_| ()))
            .await?;

        self.reporter
            .step(&StepReport::deleted(ResourceKind::Bucket, &bucket.name));
        Ok(())
    }
}
