use crate::context::Context;
use chatanoo_cloud::DomainResource;
use colored::Colorize;

use super::super::DomainCommands;

pub async fn handle(ctx: &Context, cmd: DomainCommands) -> anyhow::Result<()> {
    match cmd {
        DomainCommands::Create { domain } => {
            let domain = match domain {
                Some(d) => d,
                None => ctx.domain().await,
            };
            println!("{}", format!("Creating hosted zone {}...", domain).blue());

            let zone = ctx.controllers.domain.create(&domain).await?;

            println!();
            println!(
                "{}",
                format!("✓ Hosted zone {} ({}) created", domain, zone.zone_id)
                    .green()
                    .bold()
            );
        }
        DomainCommands::Delete { domain } => {
            let domain = match domain {
                Some(d) => d,
                None => ctx.domain().await,
            };
            println!("{}", format!("Deleting hosted zone {}...", domain).blue());

            ctx.controllers.domain.delete(&domain).await?;

            println!();
            println!(
                "{}",
                format!("✓ Hosted zone {} deleted", domain).green().bold()
            );
        }
    }

    Ok(())
}
