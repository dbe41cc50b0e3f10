//! Chatanoo provisioning core
//!
//! This crate stands up and tears down the AWS resources behind a Chatanoo
//! media-delivery environment: a hosted zone, storage buckets fronted by CDN
//! distributions, an IAM role/policy pair and a transcoding pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                 chatanoo CLI                     │
//! │        (provision / deprovision / ...)           │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │                 chatanoo-cloud                   │
//! │  ┌──────────────────────────────────────────┐   │
//! │  │               Workflow                    │   │
//! │  └──────────────────────────────────────────┘   │
//! │  ┌────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐ │
//! │  │ Domain │ │ Storage │ │ Identity │ │Transcod│ │
//! │  └────────┘ └─────────┘ └──────────┘ └────────┘ │
//! │  ┌──────────────┐  ┌─────────────────────────┐  │
//! │  │ Provider API │  │ Environment state (YAML)│  │
//! │  └──────────────┘  └─────────────────────────┘  │
//! └───────┬─────────────────────────────────────────┘
//!         │
//! ┌───────▼────────────┐
//! │ chatanoo-cloud-aws │
//! └────────────────────┘
//! ```
//!
//! State flows bottom-up: every successful provider call is recorded in the
//! environment document before the next step starts, so a failed workflow
//! leaves an accurate restart point behind.

pub mod action;
pub mod controller;
pub mod error;
pub mod naming;
pub mod policy;
pub mod presets;
pub mod provider;
pub mod state;
pub mod store;
pub mod workflow;

#[cfg(test)]
pub(crate) mod testing;

// Re-exports
pub use action::{ActionType, Reporter, ResourceKind, StepReport};
pub use controller::{
    Controllers, DomainController, DomainResource, IdentityController, IdentityResource,
    StorageController, StorageOutcome, StorageResource, TranscoderController,
    TranscoderResource,
};
pub use error::{CloudError, ErrorKind, PresetFailure, Result};
pub use presets::{PresetKind, PresetSpec};
pub use provider::{
    BucketAcl, BucketOptions, CacheTtl, CdnClient, CorsRule, CreatedZone, DistributionConfig,
    DistributionInfo, DistributionSnapshot, DistributionSpec, DnsClient, DnsRecord,
    IdentityClient, PipelineSpec, Providers, StorageClient, Tag, TranscoderClient,
    ViewerProtocolPolicy, ZoneClient,
};
pub use state::{
    BucketRecord, Credentials, DistributionRecord, DistributionStatus, Environment,
    HostedZoneRecord, RoleRecord, TranscoderState,
};
pub use store::{EnvironmentHandle, EnvironmentStore};
pub use workflow::Workflow;
