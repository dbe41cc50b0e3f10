use super::IdentityResource;
use crate::action::{Reporter, ResourceKind, StepReport};
use crate::error::{CloudError, Result};
use crate::naming;
use crate::policy;
use crate::provider::IdentityClient;
use crate::state::RoleRecord;
use crate::store::EnvironmentHandle;
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// IAM roles, each with a dedicated policy
pub struct IdentityController {
    env: EnvironmentHandle,
    identity: Arc<dyn IdentityClient>,
    reporter: Arc<dyn Reporter>,
}

impl IdentityController {
    pub fn new(
        env: EnvironmentHandle,
        identity: Arc<dyn IdentityClient>,
        reporter: Arc<dyn Reporter>,
    ) -> Self {
        Self {
            env,
            identity,
            reporter,
        }
    }
}

#[async_trait]
impl IdentityResource for IdentityController {
    async fn create_role(&self, name: &str, policy_document: &str) -> Result<RoleRecord> {
        let env_name = self
            .env
            .read(|env| {
                if env.role(name).is_some() {
                    return Err(CloudError::already_exists(ResourceKind::Role, name));
                }
                Ok(env.name.clone())
            })
            .await?;
        policy::validate_document(policy_document)?;

        let role_name = naming::role_name(&env_name, name);
        let policy_arn = self
            .identity
            .create_policy(&naming::policy_name(&env_name, name), policy_document)
            .await?;
        let role_arn = self
            .identity
            .create_role(&role_name, &policy::trust_document())
            .await?;
        self.identity.attach_policy(&role_name, &policy_arn).await?;

        let record = RoleRecord {
            name: name.to_string(),
            role_name,
            role_arn,
            policy_arn,
            created_at: Utc::now(),
        };
        self.env
            .update(|env| env.insert_role(record.clone()))
            .await?;

        self.reporter
            .step(&StepReport::created(ResourceKind::Role, &record.role_name));
        Ok(record)
    }

    async fn delete_role(&self, name: &str) -> Result<()> {
        let record = self
            .env
            .read(|env| env.role(name).cloned())
            .await
            .ok_or_else(|| CloudError::not_found(ResourceKind::Role, name))?;

        self.identity
            .detach_policy(&record.role_name, &record.policy_arn)
            .await?;
        self.identity.delete_role(&record.role_name).await?;
        self.identity.delete_policy(&record.policy_arn).await?;

        self.env
            .update(|env| env.remove_role(name).map(|_| ()))
            .await?;

        self.reporter
            .step(&StepReport::deleted(ResourceKind::Role, &record.role_name));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::testing::Fixture;

    const POLICY: &str = r#"{"Version":"2012-10-17","Statement":[]}"#;

    fn controller(fx: &Fixture) -> IdentityController {
        IdentityController::new(fx.env.clone(), fx.provider.clone(), fx.reporter.clone())
    }

    #[tokio::test]
    async fn test_create_role_order() {
        let fx = Fixture::new().await;
        let record = controller(&fx).create_role("transcoder", POLICY).await.unwrap();

        assert_eq!(record.role_name, "chatanoo-staging-transcoder-role");
        assert_eq!(
            fx.provider.calls(),
            vec![
                "create_policy chatanoo-staging-transcoder-policy",
                "create_role chatanoo-staging-transcoder-role",
                "attach_policy chatanoo-staging-transcoder-role<-arn:aws:iam::123456789012:policy/chatanoo-staging-transcoder-policy",
            ]
        );
        assert_eq!(fx.persisted().await.role("transcoder"), Some(&record));
    }

    #[tokio::test]
    async fn test_create_role_rejects_invalid_document() {
        let fx = Fixture::new().await;

        let err = controller(&fx)
            .create_role("transcoder", "not json")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(fx.provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_existing_role_is_rejected() {
        let fx = Fixture::new().await;
        let identity = controller(&fx);
        identity.create_role("transcoder", POLICY).await.unwrap();
        fx.provider.clear();

        let err = identity.create_role("transcoder", POLICY).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert!(fx.provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_attach_failure_stores_nothing() {
        let fx = Fixture::new().await;
        fx.provider.fail("attach_policy");

        controller(&fx)
            .create_role("transcoder", POLICY)
            .await
            .unwrap_err();
        assert!(fx.persisted().await.role("transcoder").is_none());
    }

    #[tokio::test]
    async fn test_delete_role_order() {
        let fx = Fixture::new().await;
        let identity = controller(&fx);
        identity.create_role("transcoder", POLICY).await.unwrap();
        fx.provider.clear();

        identity.delete_role("transcoder").await.unwrap();

        assert_eq!(
            fx.provider.operations(),
            vec!["detach_policy", "delete_role", "delete_policy"]
        );
        assert!(fx.persisted().await.roles.is_empty());
    }

    #[tokio::test]
    async fn test_delete_role_keeps_record_until_policy_is_gone() {
        let fx = Fixture::new().await;
        let identity = controller(&fx);
        identity.create_role("transcoder", POLICY).await.unwrap();
        fx.provider.fail("delete_policy");

        let err = identity.delete_role("transcoder").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider);
        assert!(fx.persisted().await.role("transcoder").is_some());
    }

    #[tokio::test]
    async fn test_delete_unknown_role_makes_no_call() {
        let fx = Fixture::new().await;

        let err = controller(&fx).delete_role("transcoder").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(fx.provider.calls().is_empty());
    }
}
