//! Resource controllers
//!
//! One controller per resource family. Each checks the environment state
//! before touching the provider, performs its provider calls strictly in
//! order, and records every completed sub-step before starting the next one.
//! Nothing is rolled back: on failure the state describes exactly what
//! exists, and re-running the command after fixing the cause resumes from
//! there.

mod domain;
mod identity;
mod storage;
mod transcoder;

pub use domain::DomainController;
pub use identity::IdentityController;
pub use storage::{StorageController, StorageOutcome};
pub use transcoder::TranscoderController;

use crate::action::Reporter;
use crate::error::Result;
use crate::provider::Providers;
use crate::state::{HostedZoneRecord, RoleRecord, TranscoderState};
use crate::store::EnvironmentHandle;
use async_trait::async_trait;
use std::sync::Arc;

/// Hosted zone lifecycle
#[async_trait]
pub trait DomainResource: Send + Sync {
    async fn create(&self, domain: &str) -> Result<HostedZoneRecord>;

    async fn delete(&self, domain: &str) -> Result<()>;
}

/// Bucket, optionally fronted by a CDN alias on `domain`
#[async_trait]
pub trait StorageResource: Send + Sync {
    async fn create(&self, logical_name: &str, domain: Option<&str>) -> Result<StorageOutcome>;

    async fn delete(&self, logical_name: &str, domain: Option<&str>) -> Result<()>;
}

/// Role/policy pairs
#[async_trait]
pub trait IdentityResource: Send + Sync {
    async fn create_role(&self, name: &str, policy_document: &str) -> Result<RoleRecord>;

    async fn delete_role(&self, name: &str) -> Result<()>;
}

/// Presets, pipeline role and pipeline
#[async_trait]
pub trait TranscoderResource: Send + Sync {
    async fn create(&self, input: &str, output: &str) -> Result<TranscoderState>;

    async fn delete(&self) -> Result<()>;
}

/// Every controller, wired to one environment and one set of clients
#[derive(Clone)]
pub struct Controllers {
    pub domain: Arc<DomainController>,
    pub storage: Arc<StorageController>,
    pub identity: Arc<IdentityController>,
    pub transcoder: Arc<TranscoderController>,
}

impl Controllers {
    pub fn new(env: EnvironmentHandle, providers: &Providers, reporter: Arc<dyn Reporter>) -> Self {
        let identity = Arc::new(IdentityController::new(
            env.clone(),
            providers.identity.clone(),
            reporter.clone(),
        ));

        Self {
            domain: Arc::new(DomainController::new(
                env.clone(),
                providers.zones.clone(),
                reporter.clone(),
            )),
            storage: Arc::new(StorageController::new(
                env.clone(),
                providers.storage.clone(),
                providers.cdn.clone(),
                providers.dns.clone(),
                reporter.clone(),
            )),
            transcoder: Arc::new(TranscoderController::new(
                env,
                providers.transcoder.clone(),
                identity.clone(),
                reporter,
            )),
            identity,
        }
    }
}
