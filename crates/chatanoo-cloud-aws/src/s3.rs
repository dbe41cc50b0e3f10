//! S3 buckets

use crate::cli::AwsCli;
use async_trait::async_trait;
use chatanoo_cloud::{BucketOptions, CorsRule, StorageClient, Tag};
use serde_json::{json, Value};
use std::sync::Arc;

const SERVICE: &str = "s3api";

/// Region where S3 rejects an explicit location constraint
const DEFAULT_REGION: &str = "us-east-1";

pub struct S3 {
    cli: Arc<AwsCli>,
}

impl S3 {
    pub fn new(cli: Arc<AwsCli>) -> Self {
        Self { cli }
    }
}

/// Arguments for `s3api create-bucket`
pub fn create_bucket_args(name: &str, options: &BucketOptions) -> Vec<String> {
    let mut args = vec![
        "--bucket".to_string(),
        name.to_string(),
        "--acl".to_string(),
        options.acl.as_str().to_string(),
    ];

    if options.region != DEFAULT_REGION {
        args.push("--create-bucket-configuration".to_string());
        args.push(format!("LocationConstraint={}", options.region));
    }
    args
}

pub fn cors_configuration(rules: &[CorsRule]) -> Value {
    json!({ "CORSRules": rules })
}

pub fn tagging(tags: &[Tag]) -> Value {
    json!({ "TagSet": tags })
}

#[async_trait]
impl StorageClient for S3 {
    async fn create_bucket(&self, name: &str, options: &BucketOptions) -> chatanoo_cloud::Result<()> {
        let args = create_bucket_args(name, options);
        let args: Vec<&str> = args.iter().map(String::as_str).collect();

        self.cli.run_command(SERVICE, "create-bucket", &args).await?;
        Ok(())
    }

    async fn delete_bucket(&self, name: &str) -> chatanoo_cloud::Result<()> {
        self.cli
            .run_command(SERVICE, "delete-bucket", &["--bucket", name])
            .await?;
        Ok(())
    }

    async fn put_cors(&self, name: &str, rules: &[CorsRule]) -> chatanoo_cloud::Result<()> {
        let configuration = cors_configuration(rules).to_string();
        self.cli
            .run_command(
                SERVICE,
                "put-bucket-cors",
                &["--bucket", name, "--cors-configuration", &configuration],
            )
            .await?;
        Ok(())
    }

    async fn put_tags(&self, name: &str, tags: &[Tag]) -> chatanoo_cloud::Result<()> {
        let tagging = tagging(tags).to_string();
        self.cli
            .run_command(
                SERVICE,
                "put-bucket-tagging",
                &["--bucket", name, "--tagging", &tagging],
            )
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatanoo_cloud::BucketAcl;

    #[test]
    fn test_create_bucket_args_with_region() {
        let options = BucketOptions {
            acl: BucketAcl::PublicRead,
            region: "eu-west-1".to_string(),
        };
        assert_eq!(
            create_bucket_args("chatanoo-staging-cdn", &options),
            vec![
                "--bucket",
                "chatanoo-staging-cdn",
                "--acl",
                "public-read",
                "--create-bucket-configuration",
                "LocationConstraint=eu-west-1"
            ]
        );
    }

    #[test]
    fn test_create_bucket_args_default_region() {
        let options = BucketOptions {
            acl: BucketAcl::PublicRead,
            region: "us-east-1".to_string(),
        };
        let args = create_bucket_args("chatanoo-staging-cdn", &options);
        assert!(!args.iter().any(|a| a.starts_with("LocationConstraint")));
    }

    #[test]
    fn test_cors_and_tagging_documents() {
        let cors = cors_configuration(&[CorsRule::permissive()]);
        assert_eq!(cors["CORSRules"][0]["AllowedOrigins"][0], "*");
        assert_eq!(cors["CORSRules"][0]["ExposeHeaders"][0], "ETag");

        let tags = tagging(&[Tag::new("chatanoo:env", "staging")]);
        assert_eq!(tags["TagSet"][0]["Key"], "chatanoo:env");
        assert_eq!(tags["TagSet"][0]["Value"], "staging");
    }
}
