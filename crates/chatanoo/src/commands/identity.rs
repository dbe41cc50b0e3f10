use crate::context::Context;
use chatanoo_cloud::IdentityResource;
use colored::Colorize;
use std::path::Path;

use super::super::IdentityCommands;

pub async fn handle(ctx: &Context, cmd: IdentityCommands) -> anyhow::Result<()> {
    match cmd {
        IdentityCommands::CreateRole { name, policy } => {
            let document = read_policy(policy.as_deref())?;
            println!("{}", format!("Creating role '{}'...", name).blue());

            let role = ctx
                .controllers
                .identity
                .create_role(&name, &document)
                .await?;

            println!();
            println!(
                "{}",
                format!("✓ Role {} created", role.role_name).green().bold()
            );
            println!("  Role:   {}", role.role_arn.cyan());
            println!("  Policy: {}", role.policy_arn.cyan());
        }
        IdentityCommands::DeleteRole { name } => {
            println!("{}", format!("Deleting role '{}'...", name).blue());

            ctx.controllers.identity.delete_role(&name).await?;

            println!();
            println!("{}", format!("✓ Role '{}' deleted", name).green().bold());
        }
    }

    Ok(())
}

/// Policy from a file path, inline JSON, or stdin when no argument is given
fn read_policy(arg: Option<&str>) -> anyhow::Result<String> {
    match arg {
        None => Ok(std::io::read_to_string(std::io::stdin())?),
        Some(value) if Path::new(value).is_file() => Ok(std::fs::read_to_string(value)?),
        Some(value) => Ok(value.to_string()),
    }
}
