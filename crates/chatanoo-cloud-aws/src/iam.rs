//! IAM roles and managed policies

use crate::cli::{string_at, AwsCli};
use async_trait::async_trait;
use chatanoo_cloud::IdentityClient;
use std::sync::Arc;

const SERVICE: &str = "iam";

pub struct Iam {
    cli: Arc<AwsCli>,
}

impl Iam {
    pub fn new(cli: Arc<AwsCli>) -> Self {
        Self { cli }
    }
}

#[async_trait]
impl IdentityClient for Iam {
    async fn create_policy(&self, name: &str, document: &str) -> chatanoo_cloud::Result<String> {
        let response = self
            .cli
            .run_json(
                SERVICE,
                "create-policy",
                &["--policy-name", name, "--policy-document", document],
            )
            .await?;
        Ok(string_at(&response, "/Policy/Arn", "iam create-policy")?)
    }

    async fn create_role(&self, name: &str, trust_document: &str) -> chatanoo_cloud::Result<String> {
        let response = self
            .cli
            .run_json(
                SERVICE,
                "create-role",
                &[
                    "--role-name",
                    name,
                    "--assume-role-policy-document",
                    trust_document,
                ],
            )
            .await?;
        Ok(string_at(&response, "/Role/Arn", "iam create-role")?)
    }

    async fn attach_policy(&self, role_name: &str, policy_arn: &str) -> chatanoo_cloud::Result<()> {
        self.cli
            .run_command(
                SERVICE,
                "attach-role-policy",
                &["--role-name", role_name, "--policy-arn", policy_arn],
            )
            .await?;
        Ok(())
    }

    async fn detach_policy(&self, role_name: &str, policy_arn: &str) -> chatanoo_cloud::Result<()> {
        self.cli
            .run_command(
                SERVICE,
                "detach-role-policy",
                &["--role-name", role_name, "--policy-arn", policy_arn],
            )
            .await?;
        Ok(())
    }

    async fn delete_role(&self, role_name: &str) -> chatanoo_cloud::Result<()> {
        self.cli
            .run_command(SERVICE, "delete-role", &["--role-name", role_name])
            .await?;
        Ok(())
    }

    async fn delete_policy(&self, policy_arn: &str) -> chatanoo_cloud::Result<()> {
        self.cli
            .run_command(SERVICE, "delete-policy", &["--policy-arn", policy_arn])
            .await?;
        Ok(())
    }
}
