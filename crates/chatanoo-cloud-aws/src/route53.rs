//! Route 53 hosted zones and record sets

use crate::cli::{string_at, value_at, AwsCli};
use crate::error::Result;
use async_trait::async_trait;
use chatanoo_cloud::{CreatedZone, DnsClient, DnsRecord, Tag, ZoneClient};
use serde_json::{json, Value};
use std::sync::Arc;

const SERVICE: &str = "route53";

pub struct Route53 {
    cli: Arc<AwsCli>,
}

impl Route53 {
    pub fn new(cli: Arc<AwsCli>) -> Self {
        Self { cli }
    }

    async fn change_record(&self, zone_id: &str, action: &str, record: &DnsRecord) -> Result<()> {
        let batch = change_batch(action, record).to_string();
        self.cli
            .run_command(
                SERVICE,
                "change-resource-record-sets",
                &["--hosted-zone-id", zone_id, "--change-batch", &batch],
            )
            .await?;
        Ok(())
    }
}

/// Bare zone id as the tagging API expects it
pub fn zone_resource_id(zone_id: &str) -> &str {
    zone_id.trim_start_matches("/hostedzone/")
}

pub fn change_batch(action: &str, record: &DnsRecord) -> Value {
    json!({
        "Changes": [{
            "Action": action,
            "ResourceRecordSet": {
                "Name": record.name,
                "Type": record.record_type,
                "TTL": record.ttl,
                "ResourceRecords": [{ "Value": record.value }]
            }
        }]
    })
}

/// Keep the `HostedZone` object verbatim as the zone descriptor
pub fn parse_created_zone(response: &Value) -> Result<CreatedZone> {
    let command = "route53 create-hosted-zone";
    Ok(CreatedZone {
        id: string_at(response, "/HostedZone/Id", command)?,
        descriptor: value_at(response, "/HostedZone", command)?,
    })
}

#[async_trait]
impl ZoneClient for Route53 {
    async fn create_zone(
        &self,
        name: &str,
        caller_reference: &str,
    ) -> chatanoo_cloud::Result<CreatedZone> {
        let response = self
            .cli
            .run_json(
                SERVICE,
                "create-hosted-zone",
                &["--name", name, "--caller-reference", caller_reference],
            )
            .await?;
        Ok(parse_created_zone(&response)?)
    }

    async fn delete_zone(&self, id: &str) -> chatanoo_cloud::Result<()> {
        self.cli
            .run_command(SERVICE, "delete-hosted-zone", &["--id", id])
            .await?;
        Ok(())
    }

    async fn tag_zone(&self, id: &str, tags: &[Tag]) -> chatanoo_cloud::Result<()> {
        let input = json!({
            "ResourceType": "hostedzone",
            "ResourceId": zone_resource_id(id),
            "AddTags": tags,
        })
        .to_string();

        self.cli
            .run_command(
                SERVICE,
                "change-tags-for-resource",
                &["--cli-input-json", &input],
            )
            .await?;
        Ok(())
    }
}

#[async_trait]
impl DnsClient for Route53 {
    async fn upsert_record(&self, zone_id: &str, record: &DnsRecord) -> chatanoo_cloud::Result<()> {
        Ok(self.change_record(zone_id, "UPSERT", record).await?)
    }

    async fn delete_record(&self, zone_id: &str, record: &DnsRecord) -> chatanoo_cloud::Result<()> {
        Ok(self.change_record(zone_id, "DELETE", record).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_batch() {
        let record = DnsRecord::cname("cdn.example.com.", 300, "d1.cloudfront.net");
        let batch = change_batch("UPSERT", &record);

        let change = &batch["Changes"][0];
        assert_eq!(change["Action"], "UPSERT");
        assert_eq!(change["ResourceRecordSet"]["Type"], "CNAME");
        assert_eq!(change["ResourceRecordSet"]["TTL"], 300);
        assert_eq!(
            change["ResourceRecordSet"]["ResourceRecords"][0]["Value"],
            "d1.cloudfront.net"
        );
    }

    #[test]
    fn test_parse_created_zone() {
        let response = json!({
            "Location": "https://route53.amazonaws.com/2013-04-01/hostedzone/Z0123",
            "HostedZone": {
                "Id": "/hostedzone/Z0123",
                "Name": "example.com.",
                "CallerReference": "ref",
                "Config": { "PrivateZone": false },
                "ResourceRecordSetCount": 2
            },
            "DelegationSet": { "NameServers": ["ns-1.awsdns-01.org"] }
        });

        let zone = parse_created_zone(&response).unwrap();
        assert_eq!(zone.id, "/hostedzone/Z0123");
        assert_eq!(zone.descriptor["Config"]["PrivateZone"], false);
        assert_eq!(zone_resource_id(&zone.id), "Z0123");
    }

    #[test]
    fn test_parse_created_zone_without_zone() {
        assert!(parse_created_zone(&json!({})).is_err());
    }
}
