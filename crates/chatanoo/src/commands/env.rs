use crate::context::require_env_name;
use chatanoo_cloud::{Credentials, Environment, EnvironmentStore};
use colored::Colorize;

use super::super::EnvCommands;

pub async fn handle(cmd: EnvCommands, selected: Option<String>) -> anyhow::Result<()> {
    let store = EnvironmentStore::from_default_location()?;

    match cmd {
        EnvCommands::Init {
            name,
            access_key_id,
            secret_access_key,
            region,
            domain,
        } => {
            let env = Environment::new(
                name.clone(),
                Credentials {
                    access_key_id,
                    secret_access_key,
                    region,
                },
                domain,
            );
            store.create(&env).await?;

            println!(
                "{}",
                format!("✓ Environment '{}' created", name).green().bold()
            );
            println!("  {}", store.path(&name).display().to_string().cyan());
            println!();
            println!("{}", "Provision it with:".bold());
            println!("  {} -e {} provision", "chatanoo".cyan(), name);
        }
        EnvCommands::List => {
            let names = store.list()?;
            if names.is_empty() {
                println!(
                    "{}",
                    format!(
                        "No environments in {} (set {} to use another directory)",
                        store.dir().display(),
                        chatanoo_config::HOME_ENV_VAR
                    )
                    .dimmed()
                );
                println!("Create one with: {} env init <name>", "chatanoo".cyan());
                return Ok(());
            }

            for name in names {
                if selected.as_deref() == Some(name.as_str()) {
                    println!("* {}", name.green().bold());
                } else {
                    println!("  {}", name);
                }
            }
        }
        EnvCommands::Show => {
            let name = require_env_name(selected)?;
            let env = store.load(&name).await?;
            print_environment(&env);
        }
    }

    Ok(())
}

fn print_environment(env: &Environment) {
    println!("{} {}", "Environment:".bold(), env.name.cyan());
    println!("  Domain:     {}", env.domain);
    println!("  Region:     {}", env.credentials.region);
    println!("  Access key: {}", env.credentials.masked_access_key());
    println!("  Updated:    {}", env.updated_at.format("%Y-%m-%d %H:%M:%S UTC"));

    println!();
    println!("{}", "Hosted zones".bold());
    if env.hosted_zones.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for zone in env.hosted_zones.values() {
        println!("  {} {}", zone.domain, zone.zone_id.dimmed());
    }

    println!();
    println!("{}", "Buckets".bold());
    if env.buckets.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for bucket in env.buckets.values() {
        println!("  {} {}", bucket.logical_name, bucket.name.dimmed());
    }

    println!();
    println!("{}", "Distributions".bold());
    if env.distributions.is_empty() && env.retired_distributions.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for distribution in env.distributions.values().flat_map(|by_name| by_name.values()) {
        let pending = if distribution.dns_record {
            String::new()
        } else {
            format!(" {}", "(alias not written, re-run storage create)".yellow())
        };
        println!(
            "  {} -> {} {}{}",
            distribution.alias,
            distribution.domain_name,
            distribution.id.dimmed(),
            pending
        );
    }
    for distribution in &env.retired_distributions {
        println!(
            "  {} {} {}",
            distribution.alias.dimmed(),
            distribution.id.dimmed(),
            "(disabled, delete manually)".yellow()
        );
    }

    println!();
    println!("{}", "Roles".bold());
    if env.roles.is_empty() {
        println!("  {}", "(none)".dimmed());
    }
    for role in env.roles.values() {
        println!("  {} {}", role.name, role.role_arn.dimmed());
    }

    println!();
    println!("{}", "Transcoder".bold());
    match env.transcoder() {
        None => println!("  {}", "(none)".dimmed()),
        Some(transcoder) => {
            let pipeline = transcoder.pipeline.as_deref().unwrap_or("(no pipeline)");
            println!("  Pipeline: {}", pipeline);
            for (kind, id) in &transcoder.presets {
                println!("  Preset {}: {}", kind, id.dimmed());
            }
        }
    }
}
