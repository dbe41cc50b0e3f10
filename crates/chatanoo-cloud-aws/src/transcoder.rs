//! Elastic Transcoder presets and pipelines

use crate::cli::{string_at, AwsCli};
use crate::error::Result;
use async_trait::async_trait;
use chatanoo_cloud::{PipelineSpec, PresetSpec, TranscoderClient};
use std::sync::Arc;

const SERVICE: &str = "elastictranscoder";

pub struct ElasticTranscoder {
    cli: Arc<AwsCli>,
}

impl ElasticTranscoder {
    pub fn new(cli: Arc<AwsCli>) -> Self {
        Self { cli }
    }

    /// Run a create command with `input` as its full request body
    async fn create<T: serde::Serialize + ?Sized>(
        &self,
        command: &str,
        input: &T,
        id_pointer: &str,
    ) -> Result<String> {
        let input = serde_json::to_string(input)?;
        let response = self
            .cli
            .run_json(SERVICE, command, &["--cli-input-json", &input])
            .await?;
        string_at(&response, id_pointer, &format!("{} {}", SERVICE, command))
    }
}

#[async_trait]
impl TranscoderClient for ElasticTranscoder {
    async fn create_preset(&self, spec: &PresetSpec) -> chatanoo_cloud::Result<String> {
        tracing::debug!("Creating preset {}", spec.name);
        Ok(self.create("create-preset", spec, "/Preset/Id").await?)
    }

    async fn delete_preset(&self, id: &str) -> chatanoo_cloud::Result<()> {
        self.cli
            .run_command(SERVICE, "delete-preset", &["--id", id])
            .await?;
        Ok(())
    }

    async fn create_pipeline(&self, spec: &PipelineSpec) -> chatanoo_cloud::Result<String> {
        tracing::debug!("Creating pipeline {}", spec.name);
        Ok(self.create("create-pipeline", spec, "/Pipeline/Id").await?)
    }

    async fn delete_pipeline(&self, id: &str) -> chatanoo_cloud::Result<()> {
        self.cli
            .run_command(SERVICE, "delete-pipeline", &["--id", id])
            .await?;
        Ok(())
    }
}
