use crate::context::Context;
use chatanoo_cloud::StorageResource;
use colored::Colorize;

use super::super::StorageCommands;

pub async fn handle(ctx: &Context, cmd: StorageCommands) -> anyhow::Result<()> {
    match cmd {
        StorageCommands::Create { name, domain } => {
            println!("{}", format!("Creating storage '{}'...", name).blue());

            let outcome = ctx
                .controllers
                .storage
                .create(&name, domain.as_deref())
                .await?;

            println!();
            println!(
                "{}",
                format!("✓ Bucket {} created", outcome.bucket.name)
                    .green()
                    .bold()
            );
            if let Some(distribution) = outcome.distribution {
                println!(
                    "  {} -> {}",
                    distribution.alias.cyan(),
                    distribution.domain_name
                );
            }
        }
        StorageCommands::Delete { name, domain } => {
            println!("{}", format!("Deleting storage '{}'...", name).blue());

            ctx.controllers
                .storage
                .delete(&name, domain.as_deref())
                .await?;

            println!();
            println!(
                "{}",
                format!("✓ Storage '{}' deleted", name).green().bold()
            );
        }
    }

    Ok(())
}
