use crate::context::Context;
use chatanoo_cloud::TranscoderResource;
use colored::Colorize;

use super::super::TranscoderCommands;

pub async fn handle(ctx: &Context, cmd: TranscoderCommands) -> anyhow::Result<()> {
    match cmd {
        TranscoderCommands::Create { input, output } => {
            println!(
                "{}",
                format!("Creating transcoder ({} -> {})...", input, output).blue()
            );

            let state = ctx.controllers.transcoder.create(&input, &output).await?;

            println!();
            println!(
                "{}",
                format!(
                    "✓ Transcoder created with {} presets",
                    state.presets.len()
                )
                .green()
                .bold()
            );
            if let Some(pipeline) = state.pipeline {
                println!("  Pipeline: {}", pipeline.cyan());
            }
        }
        TranscoderCommands::Delete => {
            println!("{}", "Deleting transcoder...".blue());

            ctx.controllers.transcoder.delete().await?;

            println!();
            println!("{}", "✓ Transcoder deleted".green().bold());
        }
    }

    Ok(())
}
