//! AWS provider for Chatanoo
//!
//! Implements the chatanoo-cloud provider traits on top of the `aws` CLI:
//!
//! - Route 53 hosted zones and record sets
//! - S3 buckets
//! - CloudFront distributions
//! - IAM roles and policies
//! - Elastic Transcoder presets and pipelines
//!
//! # Requirements
//!
//! - `aws` CLI v2 must be installed and on `PATH`
//! - Credentials come from the environment document, never from local profiles
//!
//! # Example
//!
//! ```ignore
//! use chatanoo_cloud_aws::providers;
//!
//! let providers = providers(&env.credentials);
//! let zone = providers.zones.create_zone("example.com.", "ref").await?;
//! ```

pub mod cli;
pub mod cloudfront;
pub mod error;
pub mod iam;
pub mod route53;
pub mod s3;
pub mod transcoder;

pub use cli::AwsCli;
pub use cloudfront::CloudFront;
pub use error::{AwsError, Result};
pub use iam::Iam;
pub use route53::Route53;
pub use s3::S3;
pub use transcoder::ElasticTranscoder;

use chatanoo_cloud::{Credentials, Providers};
use std::sync::Arc;

/// Every client, sharing one CLI wrapper
pub fn providers(credentials: &Credentials) -> Providers {
    from_cli(AwsCli::new(credentials.clone()))
}

pub fn from_cli(cli: AwsCli) -> Providers {
    let cli = Arc::new(cli);
    let route53 = Arc::new(Route53::new(cli.clone()));

    Providers {
        zones: route53.clone(),
        dns: route53,
        storage: Arc::new(S3::new(cli.clone())),
        cdn: Arc::new(CloudFront::new(cli.clone())),
        identity: Arc::new(Iam::new(cli.clone())),
        transcoder: Arc::new(ElasticTranscoder::new(cli)),
    }
}
