//! Composite provisioning operations
//!
//! Each operation is a fixed sequence of controller calls. The first failure
//! aborts the sequence and is returned tagged with the step that failed;
//! everything completed before it stays in the environment state. Create
//! sequences skip steps the state already shows as complete, so a failed
//! run is finished by running it again.

use crate::controller::{Controllers, DomainResource, StorageResource, TranscoderResource};
use crate::error::Result;
use crate::naming::{CDN_BUCKET, MEDIA_INPUT_BUCKET, MEDIA_OUTPUT_BUCKET};
use crate::store::EnvironmentHandle;
use std::sync::Arc;

/// Runs controllers in dependency order
pub struct Workflow {
    env: EnvironmentHandle,
    domain: Arc<dyn DomainResource>,
    storage: Arc<dyn StorageResource>,
    transcoder: Arc<dyn TranscoderResource>,
}

impl Workflow {
    pub fn new(
        env: EnvironmentHandle,
        domain: Arc<dyn DomainResource>,
        storage: Arc<dyn StorageResource>,
        transcoder: Arc<dyn TranscoderResource>,
    ) -> Self {
        Self {
            env,
            domain,
            storage,
            transcoder,
        }
    }

    pub fn from_controllers(env: EnvironmentHandle, controllers: &Controllers) -> Self {
        Self::new(
            env,
            controllers.domain.clone(),
            controllers.storage.clone(),
            controllers.transcoder.clone(),
        )
    }

    async fn domain_name(&self) -> String {
        self.env.read(|env| env.domain.clone()).await
    }

    async fn storage_ready(&self, logical_name: &str, domain: Option<&str>) -> bool {
        self.env
            .read(|env| env.storage_ready(logical_name, domain))
            .await
    }

    async fn create_storage(&self, logical_name: &str, domain: Option<&str>) -> Result<()> {
        if self.storage_ready(logical_name, domain).await {
            tracing::debug!("Storage {} already provisioned, skipping", logical_name);
            return Ok(());
        }
        self.storage
            .create(logical_name, domain)
            .await
            .map_err(|e| e.in_step(format!("create storage {}", logical_name)))?;
        Ok(())
    }

    /// Hosted zone, then the CDN bucket aliased on it
    pub async fn create_domain(&self) -> Result<()> {
        let domain = self.domain_name().await;
        tracing::info!("Provisioning domain {}", domain);

        let zone_exists = self
            .env
            .read(|env| env.hosted_zone(&domain).is_some())
            .await;
        if zone_exists {
            tracing::debug!("Hosted zone {} already exists, skipping", domain);
        } else {
            self.domain
                .create(&domain)
                .await
                .map_err(|e| e.in_step(format!("create hosted zone {}", domain)))?;
        }

        self.create_storage(CDN_BUCKET, Some(&domain)).await
    }

    /// Input bucket, CDN-fronted output bucket, then the transcoder
    pub async fn create_media_center(&self) -> Result<()> {
        let domain = self.domain_name().await;
        tracing::info!("Provisioning media center on {}", domain);

        self.create_storage(MEDIA_INPUT_BUCKET, None).await?;
        self.create_storage(MEDIA_OUTPUT_BUCKET, Some(&domain)).await?;

        let transcoder_complete = self
            .env
            .read(|env| env.transcoder().is_some_and(|t| t.is_complete()))
            .await;
        if transcoder_complete {
            tracing::debug!("Transcoder already provisioned, skipping");
            return Ok(());
        }
        self.transcoder
            .create(MEDIA_INPUT_BUCKET, MEDIA_OUTPUT_BUCKET)
            .await
            .map_err(|e| e.in_step("create transcoder"))?;
        Ok(())
    }

    pub async fn create_all(&self) -> Result<()> {
        self.create_domain().await?;
        self.create_media_center().await
    }

    pub async fn delete_media_center(&self) -> Result<()> {
        let domain = self.domain_name().await;
        tracing::info!("Removing media center from {}", domain);

        self.transcoder
            .delete()
            .await
            .map_err(|e| e.in_step("delete transcoder"))?;
        self.storage
            .delete(MEDIA_OUTPUT_BUCKET, Some(&domain))
            .await
            .map_err(|e| e.in_step(format!("delete storage {}", MEDIA_OUTPUT_BUCKET)))?;
        self.storage
            .delete(MEDIA_INPUT_BUCKET, None)
            .await
            .map_err(|e| e.in_step(format!("delete storage {}", MEDIA_INPUT_BUCKET)))?;
        Ok(())
    }

    pub async fn delete_domain(&self) -> Result<()> {
        let domain = self.domain_name().await;
        tracing::info!("Removing domain {}", domain);

        self.storage
            .delete(CDN_BUCKET, Some(&domain))
            .await
            .map_err(|e| e.in_step(format!("delete storage {}", CDN_BUCKET)))?;
        self.domain
            .delete(&domain)
            .await
            .map_err(|e| e.in_step(format!("delete hosted zone {}", domain)))?;
        Ok(())
    }

    /// Mirror of [`Workflow::create_all`]
    pub async fn delete_all(&self) -> Result<()> {
        self.delete_media_center().await?;
        self.delete_domain().await
    }
}
