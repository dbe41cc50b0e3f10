use super::{IdentityResource, TranscoderResource};
use crate::action::{Reporter, ResourceKind, StepReport};
use crate::error::{CloudError, PresetFailure, Result};
use crate::naming;
use crate::policy;
use crate::presets;
use crate::provider::{PipelineSpec, TranscoderClient};
use crate::state::TranscoderState;
use crate::store::EnvironmentHandle;
use async_trait::async_trait;
use std::sync::Arc;

/// Transcoding pipeline, its presets and the role it runs as
pub struct TranscoderController {
    env: EnvironmentHandle,
    transcoder: Arc<dyn TranscoderClient>,
    identity: Arc<dyn IdentityResource>,
    reporter: Arc<dyn Reporter>,
}

impl TranscoderController {
    pub fn new(
        env: EnvironmentHandle,
        transcoder: Arc<dyn TranscoderClient>,
        identity: Arc<dyn IdentityResource>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            env,
            transcoder,
            identity,
            reporter,
        }
    }

    /// Create every preset not yet tracked, persisting each id right away
    async fn create_presets(&self, env_name: &str) -> Result<()> {
        let existing = self
            .env
            .read(|env| env.transcoder().map(|t| t.presets.clone()).unwrap_or_default())
            .await;

        for (kind, spec) in presets::catalog(env_name) {
            if existing.contains_key(&kind) {
                tracing::debug!("Preset {} already exists, skipping", kind);
                continue;
            }

            let id = self.transcoder.create_preset(&spec).await?;
            self.env
                .update(|env| {
                    env.insert_preset(kind, id.clone());
                    Ok(())
                })
                .await?;

            self.reporter.step(&StepReport::created(
                ResourceKind::Preset,
                format!("{} ({})", spec.name, id),
            ));
        }
        Ok(())
    }

    async fn delete_presets(&self) -> Result<()> {
        let tracked = self
            .env
            .read(|env| env.transcoder().map(|t| t.presets.clone()).unwrap_or_default())
            .await;

        let mut failures = Vec::new();
        for (kind, id) in tracked {
            // Presets are independent, so one refusal does not stop the others
            if let Err(e) = self.transcoder.delete_preset(&id).await {
                tracing::warn!("Failed to delete {} preset {}: {}", kind, id, e);
                failures.push(PresetFailure {
                    preset_id: id,
                    message: e.to_string(),
                });
                continue;
            }

            self.env
                .update(|env| {
                    env.remove_preset(kind);
                    Ok(())
                })
                .await?;
            self.reporter
                .step(&StepReport::deleted(ResourceKind::Preset, &id));
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(CloudError::Presets(failures))
        }
    }
}

#[async_trait]
impl TranscoderResource for TranscoderController {
    async fn create(&self, input: &str, output: &str) -> Result<TranscoderState> {
        let (env_name, input_bucket, output_bucket, role) = self
            .env
            .read(|env| {
                if let Some(pipeline) = env.transcoder().and_then(|t| t.pipeline.as_ref()) {
                    return Err(CloudError::already_exists(ResourceKind::Pipeline, pipeline));
                }

                let bucket = |logical: &str| {
                    env.bucket(logical).map(|b| b.name.clone()).ok_or_else(|| {
                        CloudError::dependency_missing(
                            ResourceKind::Pipeline,
                            naming::pipeline_name(&env.name),
                            ResourceKind::Bucket,
                            logical,
                        )
                    })
                };
                let input_bucket = bucket(input)?;
                let output_bucket = bucket(output)?;

                Ok((
                    env.name.clone(),
                    input_bucket,
                    output_bucket,
                    env.role(naming::TRANSCODER_ROLE).cloned(),
                ))
            })
            .await?;

        self.create_presets(&env_name).await?;

        let role = match role {
            Some(role) => {
                tracing::debug!("Reusing role {}", role.role_name);
                role
            }
            None => {
                self.identity
                    .create_role(naming::TRANSCODER_ROLE, &policy::transcoder_policy())
                    .await?
            }
        };

        let spec = PipelineSpec {
            name: naming::pipeline_name(&env_name),
            input_bucket,
            output_bucket,
            role: role.role_arn,
        };
        let pipeline_id = self.transcoder.create_pipeline(&spec).await?;
        self.env
            .update(|env| env.set_pipeline(pipeline_id.clone()))
            .await?;

        self.reporter.step(&StepReport::created(
            ResourceKind::Pipeline,
            format!("{} ({})", spec.name, pipeline_id),
        ));

        Ok(self
            .env
            .read(|env| env.transcoder().cloned().unwrap_or_default())
            .await)
    }

    async fn delete(&self) -> Result<()> {
        let (pipeline, has_presets, has_role) = self
            .env
            .read(|env| {
                let state = env.transcoder();
                (
                    state.and_then(|t| t.pipeline.clone()),
                    state.is_some_and(|t| !t.presets.is_empty()),
                    env.role(naming::TRANSCODER_ROLE).is_some(),
                )
            })
            .await;

        if pipeline.is_none() && !has_presets && !has_role {
            return Err(CloudError::not_found(
                ResourceKind::Transcoder,
                naming::TRANSCODER_ROLE,
            ));
        }

        if let Some(id) = pipeline {
            self.transcoder.delete_pipeline(&id).await?;
            self.env
                .update(|env| {
                    env.clear_pipeline();
                    Ok(())
                })
                .await?;
            self.reporter
                .step(&StepReport::deleted(ResourceKind::Pipeline, &id));
        }

        if has_presets {
            self.delete_presets().await?;
        }

        if has_role {
            self.identity.delete_role(naming::TRANSCODER_ROLE).await?;
        }

        self.reporter
            .step(&StepReport::deleted(ResourceKind::Transcoder, naming::TRANSCODER_ROLE));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{IdentityController, StorageController, StorageResource};
    use crate::error::ErrorKind;
    use crate::naming::{MEDIA_INPUT_BUCKET, MEDIA_OUTPUT_BUCKET};
    use crate::presets::PresetKind;
    use crate::testing::Fixture;

    fn controller(fx: &Fixture) -> TranscoderController {
        let identity = Arc::new(IdentityController::new(
            fx.env.clone(),
            fx.provider.clone(),
            fx.reporter.clone(),
        ));
        TranscoderController::new(
            fx.env.clone(),
            fx.provider.clone(),
            identity,
            fx.reporter.clone(),
        )
    }

    async fn with_buckets(fx: &Fixture) {
        let storage = StorageController::new(
            fx.env.clone(),
            fx.provider.clone(),
            fx.provider.clone(),
            fx.provider.clone(),
            fx.reporter.clone(),
        );
        storage.create(MEDIA_INPUT_BUCKET, None).await.unwrap();
        storage.create(MEDIA_OUTPUT_BUCKET, None).await.unwrap();
        fx.provider.clear();
    }

    #[tokio::test]
    async fn test_create_presets_role_pipeline() {
        let fx = Fixture::new().await;
        with_buckets(&fx).await;

        let state = controller(&fx)
            .create(MEDIA_INPUT_BUCKET, MEDIA_OUTPUT_BUCKET)
            .await
            .unwrap();
        assert!(state.is_complete());
        assert_eq!(state.presets.len(), 5);

        assert_eq!(
            fx.provider.operations(),
            vec![
                "create_preset",
                "create_preset",
                "create_preset",
                "create_preset",
                "create_preset",
                "create_policy",
                "create_role",
                "attach_policy",
                "create_pipeline"
            ]
        );
        assert!(fx.provider.calls().contains(
            &"create_pipeline arn:aws:iam::123456789012:role/chatanoo-staging-transcoder-role"
                .to_string()
        ));

        let persisted = fx.persisted().await;
        assert_eq!(persisted.transcoder(), Some(&state));
        assert!(persisted.role(naming::TRANSCODER_ROLE).is_some());
    }

    #[tokio::test]
    async fn test_create_requires_buckets() {
        let fx = Fixture::new().await;

        let err = controller(&fx)
            .create(MEDIA_INPUT_BUCKET, MEDIA_OUTPUT_BUCKET)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DependencyMissing);
        assert!(fx.provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_pipeline_failure_keeps_presets_and_role() {
        let fx = Fixture::new().await;
        with_buckets(&fx).await;
        fx.provider.fail("create_pipeline");

        let err = controller(&fx)
            .create(MEDIA_INPUT_BUCKET, MEDIA_OUTPUT_BUCKET)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider);

        let persisted = fx.persisted().await;
        let state = persisted.transcoder().unwrap();
        assert_eq!(state.presets.len(), 5);
        assert!(state.pipeline.is_none());
        assert!(persisted.role(naming::TRANSCODER_ROLE).is_some());
    }

    #[tokio::test]
    async fn test_create_resumes_after_partial_run() {
        let fx = Fixture::new().await;
        with_buckets(&fx).await;
        fx.provider.fail_for("create_preset", "flv");

        let transcoder = controller(&fx);
        transcoder
            .create(MEDIA_INPUT_BUCKET, MEDIA_OUTPUT_BUCKET)
            .await
            .unwrap_err();
        assert_eq!(fx.persisted().await.transcoder().unwrap().presets.len(), 2);

        let retry = TranscoderController::new(
            fx.env.clone(),
            crate::testing::RecordingProvider::new(),
            Arc::new(IdentityController::new(
                fx.env.clone(),
                fx.provider.clone(),
                fx.reporter.clone(),
            )),
            fx.reporter.clone(),
        );
        let state = retry
            .create(MEDIA_INPUT_BUCKET, MEDIA_OUTPUT_BUCKET)
            .await
            .unwrap();
        assert!(state.is_complete());
        assert!(state.presets.contains_key(&PresetKind::Mp4));
    }

    #[tokio::test]
    async fn test_create_twice_is_rejected() {
        let fx = Fixture::new().await;
        with_buckets(&fx).await;
        let transcoder = controller(&fx);
        transcoder
            .create(MEDIA_INPUT_BUCKET, MEDIA_OUTPUT_BUCKET)
            .await
            .unwrap();
        fx.provider.clear();

        let err = transcoder
            .create(MEDIA_INPUT_BUCKET, MEDIA_OUTPUT_BUCKET)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert!(fx.provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_delete_order() {
        let fx = Fixture::new().await;
        with_buckets(&fx).await;
        let transcoder = controller(&fx);
        transcoder
            .create(MEDIA_INPUT_BUCKET, MEDIA_OUTPUT_BUCKET)
            .await
            .unwrap();
        fx.provider.clear();

        transcoder.delete().await.unwrap();

        let operations = fx.provider.operations();
        assert_eq!(operations[0], "delete_pipeline");
        assert_eq!(
            operations.iter().filter(|op| *op == "delete_preset").count(),
            5
        );
        assert_eq!(
            &operations[6..],
            &["detach_policy", "delete_role", "delete_policy"]
        );

        let persisted = fx.persisted().await;
        assert!(persisted.transcoder().is_none());
        assert!(persisted.roles.is_empty());
    }

    #[tokio::test]
    async fn test_delete_collects_preset_failures() {
        let fx = Fixture::new().await;
        with_buckets(&fx).await;
        let transcoder = controller(&fx);
        let state = transcoder
            .create(MEDIA_INPUT_BUCKET, MEDIA_OUTPUT_BUCKET)
            .await
            .unwrap();
        let webm = state.presets[&PresetKind::Webm].clone();
        let ogg = state.presets[&PresetKind::Ogg].clone();
        fx.provider.fail_for("delete_preset", &webm);
        fx.provider.fail_for("delete_preset", &ogg);
        fx.provider.clear();

        let err = transcoder.delete().await.unwrap_err();
        match err {
            CloudError::Presets(failures) => {
                let ids: Vec<_> = failures.iter().map(|f| f.preset_id.as_str()).collect();
                assert_eq!(ids.len(), 2);
                assert!(ids.contains(&webm.as_str()));
                assert!(ids.contains(&ogg.as_str()));
            }
            other => panic!("unexpected error: {other}"),
        }

        // Every preset was attempted and the role was left alone
        let operations = fx.provider.operations();
        assert_eq!(
            operations.iter().filter(|op| *op == "delete_preset").count(),
            5
        );
        assert!(!operations.contains(&"delete_role".to_string()));

        let persisted = fx.persisted().await;
        assert_eq!(persisted.transcoder().unwrap().presets.len(), 2);
        assert!(persisted.role(naming::TRANSCODER_ROLE).is_some());
    }

    #[tokio::test]
    async fn test_delete_without_anything_tracked() {
        let fx = Fixture::new().await;

        let err = controller(&fx).delete().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(fx.provider.calls().is_empty());
    }
}
