//! Project creation command

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use appseed::{CreateOptions, CreateSettings, Creator, EventSink, TracingSink};
use appseed_cli_lib::ConsoleSink;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a new project
pub struct CreateCommand {
    /// Destination directory
    pub path: PathBuf,
    /// App id
    pub id: Option<String>,
    /// Display name
    pub name: Option<String>,
    /// Template reference
    pub template: Option<String>,
    /// Link instead of copy
    pub link: bool,
    /// Show verbose progress
    pub verbose: bool,
    /// Route progress through the JSON log instead of the console
    pub json_logs: bool,
}

impl CreateCommand {
    /// Execute the command
    pub async fn execute(self, settings: CreateSettings) -> Result<()> {
        println!(
            "{} {} {}",
            style("Creating").green().bold(),
            style("project:").bold(),
            style(self.path.display()).cyan().bold()
        );
        println!();

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Failed to set progress style")?,
        );
        spinner.enable_steady_tick(std::time::Duration::from_millis(100));

        spinner.set_message("Preparing stock template...");
        let creator = match Creator::new(settings) {
            Ok(creator) => creator,
            Err(e) => {
                spinner.finish_and_clear();
                return Err(e).context("Failed to prepare stock template");
            }
        };

        spinner.set_message(if self.template.is_some() {
            "Fetching template..."
        } else {
            "Copying stock template..."
        });
        let result = creator.create(&self.path, self.options(&spinner)).await;
        spinner.finish_and_clear();
        result.with_context(|| format!("Failed to create project at {}", self.path.display()))?;

        self.print_success();
        Ok(())
    }

    fn options(&self, spinner: &ProgressBar) -> CreateOptions {
        let events: Arc<dyn EventSink> = if self.json_logs {
            Arc::new(TracingSink)
        } else {
            Arc::new(ConsoleSink::new(spinner.clone(), self.verbose))
        };
        let mut options = CreateOptions::new().link(self.link).events(events);
        if let Some(id) = &self.id {
            options = options.id(id);
        }
        if let Some(name) = &self.name {
            options = options.name(name);
        }
        if let Some(template) = &self.template {
            options = options.template(template);
        }
        options
    }

    /// Print success message with next steps
    fn print_success(&self) {
        println!("{}", style("✓ Project created successfully!").green().bold());
        println!();
        println!("{}", style("Next steps:").bold());
        println!();
        println!("  {} Navigate to project:", style("1.").cyan());
        println!(
            "     {} {}",
            style("$").dim(),
            style(format!("cd {}", self.path.display())).cyan()
        );
        println!();
        println!("  {} Edit the app:", style("2.").cyan());
        println!("     {}", style("www/index.html").cyan());
        if self.link {
            println!();
            println!(
                "  {} www/, hooks/ and config.xml link back to the template; edits apply there.",
                style("note:").yellow()
            );
        }
    }
}
