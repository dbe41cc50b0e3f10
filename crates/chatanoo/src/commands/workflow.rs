//! Composite commands
//!
//! Each command runs one [`chatanoo_cloud::Workflow`] operation and stops at
//! the first failing step.

use crate::context::Context;
use colored::Colorize;

fn header(domain: &str, action: &str) {
    println!("{}", format!("{} {}...", action, domain).blue().bold());
}

fn done(message: &str) {
    println!();
    println!("{}", format!("✓ {}", message).green().bold());
}

pub async fn provision(ctx: &Context) -> anyhow::Result<()> {
    header(&ctx.domain().await, "Provisioning");
    ctx.workflow().create_all().await?;
    done("Environment provisioned");
    Ok(())
}

pub async fn deprovision(ctx: &Context) -> anyhow::Result<()> {
    header(&ctx.domain().await, "Deprovisioning");
    ctx.workflow().delete_all().await?;
    done("Environment deprovisioned");
    Ok(())
}

pub async fn provision_domain(ctx: &Context) -> anyhow::Result<()> {
    header(&ctx.domain().await, "Provisioning domain");
    ctx.workflow().create_domain().await?;
    done("Domain provisioned");
    Ok(())
}

pub async fn deprovision_domain(ctx: &Context) -> anyhow::Result<()> {
    header(&ctx.domain().await, "Deprovisioning domain");
    ctx.workflow().delete_domain().await?;
    done("Domain deprovisioned");
    Ok(())
}

pub async fn provision_media(ctx: &Context) -> anyhow::Result<()> {
    header(&ctx.domain().await, "Provisioning media center on");
    ctx.workflow().create_media_center().await?;
    done("Media center provisioned");
    Ok(())
}

pub async fn deprovision_media(ctx: &Context) -> anyhow::Result<()> {
    header(&ctx.domain().await, "Deprovisioning media center on");
    ctx.workflow().delete_media_center().await?;
    done("Media center deprovisioned");
    Ok(())
}
