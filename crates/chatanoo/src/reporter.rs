use chatanoo_cloud::{ActionType, Reporter, StepReport};
use colored::Colorize;

/// Prints one coloured status line per completed step
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn step(&self, report: &StepReport) {
        tracing::info!("{}", report);

        let line = report.to_string();
        let line = match report.action {
            ActionType::Create => line.green(),
            ActionType::Delete => line.normal(),
            ActionType::Disable => line.yellow(),
        };
        println!("  {} {}", "✓".green(), line);
    }

    fn warn(&self, message: &str) {
        println!("  {} {}", "⚠".yellow(), message.yellow());
    }
}
