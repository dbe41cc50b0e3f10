use crate::reporter::ConsoleReporter;
use chatanoo_cloud::{Controllers, EnvironmentHandle, EnvironmentStore, Workflow};
use colored::Colorize;
use std::sync::Arc;

/// Selected environment wired to AWS clients
pub struct Context {
    pub env: EnvironmentHandle,
    pub controllers: Controllers,
}

/// Resolve the environment name from `-e` / `CHATANOO_ENV`
pub fn require_env_name(env: Option<String>) -> anyhow::Result<String> {
    env.ok_or_else(|| {
        anyhow::anyhow!(
            "No environment selected: use chatanoo -e <name> <command> or CHATANOO_ENV=<name>"
        )
    })
}

impl Context {
    pub async fn open(env: Option<String>) -> anyhow::Result<Self> {
        let name = require_env_name(env)?;
        let store = EnvironmentStore::from_default_location()?;
        let env = EnvironmentHandle::open(store, &name).await?;

        let (domain, credentials) = env
            .read(|e| (e.domain.clone(), e.credentials.clone()))
            .await;
        println!(
            "Environment: {} ({}, {})",
            name.cyan(),
            domain,
            credentials.region
        );

        let providers = chatanoo_cloud_aws::providers(&credentials);
        let controllers = Controllers::new(env.clone(), &providers, Arc::new(ConsoleReporter));

        Ok(Self { env, controllers })
    }

    pub fn workflow(&self) -> Workflow {
        Workflow::from_controllers(self.env.clone(), &self.controllers)
    }

    pub async fn domain(&self) -> String {
        self.env.read(|e| e.domain.clone()).await
    }
}
