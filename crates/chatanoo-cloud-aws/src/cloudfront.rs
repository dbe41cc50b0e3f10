//! CloudFront distributions

use crate::cli::{string_at, value_at, AwsCli};
use crate::error::{AwsError, Result};
use async_trait::async_trait;
use chatanoo_cloud::{
    CdnClient, DistributionConfig, DistributionInfo, DistributionSnapshot, DistributionSpec,
};
use serde_json::{json, Value};
use std::sync::Arc;

const SERVICE: &str = "cloudfront";

pub struct CloudFront {
    cli: Arc<AwsCli>,
}

impl CloudFront {
    pub fn new(cli: Arc<AwsCli>) -> Self {
        Self { cli }
    }
}

/// `DistributionConfig` for a single S3 origin served under one alias
pub fn distribution_config(spec: &DistributionSpec) -> Value {
    let methods = json!({
        "Quantity": spec.allowed_methods.len(),
        "Items": spec.allowed_methods,
    });

    json!({
        "CallerReference": spec.caller_reference,
        "Aliases": { "Quantity": 1, "Items": [spec.alias] },
        "DefaultRootObject": "",
        "Origins": {
            "Quantity": 1,
            "Items": [{
                "Id": spec.origin_id,
                "DomainName": spec.origin_domain,
                "OriginPath": "",
                "S3OriginConfig": { "OriginAccessIdentity": "" }
            }]
        },
        "DefaultCacheBehavior": {
            "TargetOriginId": spec.origin_id,
            "ForwardedValues": {
                "QueryString": false,
                "Cookies": { "Forward": "none" }
            },
            "TrustedSigners": { "Enabled": false, "Quantity": 0 },
            "ViewerProtocolPolicy": spec.viewer_protocol_policy.as_str(),
            "MinTTL": spec.ttl.min,
            "DefaultTTL": spec.ttl.default,
            "MaxTTL": spec.ttl.max,
            "AllowedMethods": {
                "Quantity": spec.allowed_methods.len(),
                "Items": spec.allowed_methods,
                "CachedMethods": methods
            }
        },
        "CacheBehaviors": { "Quantity": 0 },
        "Comment": spec.comment,
        "Logging": {
            "Enabled": false,
            "IncludeCookies": false,
            "Bucket": "",
            "Prefix": ""
        },
        "PriceClass": "PriceClass_All",
        "Enabled": spec.enabled
    })
}

pub fn parse_distribution_info(response: &Value) -> Result<DistributionInfo> {
    let command = "cloudfront create-distribution";
    Ok(DistributionInfo {
        id: string_at(response, "/Distribution/Id", command)?,
        domain_name: string_at(response, "/Distribution/DomainName", command)?,
    })
}

pub fn parse_snapshot(response: &Value) -> Result<DistributionSnapshot> {
    let command = "cloudfront get-distribution-config";
    let document = value_at(response, "/DistributionConfig", command)?;
    let enabled = document
        .get("Enabled")
        .and_then(Value::as_bool)
        .ok_or_else(|| AwsError::UnexpectedResponse {
            command: command.to_string(),
            message: "missing /DistributionConfig/Enabled".to_string(),
        })?;

    Ok(DistributionSnapshot {
        etag: string_at(response, "/ETag", command)?,
        config: DistributionConfig { enabled, document },
    })
}

/// Stored document with the requested `Enabled` flag applied
pub fn config_document(config: &DistributionConfig) -> Value {
    let mut document = config.document.clone();
    if let Some(fields) = document.as_object_mut() {
        fields.insert("Enabled".to_string(), Value::Bool(config.enabled));
    }
    document
}

#[async_trait]
impl CdnClient for CloudFront {
    async fn create_distribution(
        &self,
        spec: &DistributionSpec,
    ) -> chatanoo_cloud::Result<DistributionInfo> {
        let config = distribution_config(spec).to_string();
        let response = self
            .cli
            .run_json(
                SERVICE,
                "create-distribution",
                &["--distribution-config", &config],
            )
            .await?;
        Ok(parse_distribution_info(&response)?)
    }

    async fn get_distribution(&self, id: &str) -> chatanoo_cloud::Result<DistributionSnapshot> {
        let response = self
            .cli
            .run_json(SERVICE, "get-distribution-config", &["--id", id])
            .await?;
        Ok(parse_snapshot(&response)?)
    }

    async fn update_distribution(
        &self,
        id: &str,
        config: &DistributionConfig,
        etag: &str,
    ) -> chatanoo_cloud::Result<()> {
        let document = config_document(config).to_string();
        self.cli
            .run_command(
                SERVICE,
                "update-distribution",
                &[
                    "--id",
                    id,
                    "--if-match",
                    etag,
                    "--distribution-config",
                    &document,
                ],
            )
            .await?;
        Ok(())
    }
}
