use anyhow::Result;
use herbtrace::app::{App, View};
use herbtrace::config::HerbTraceConfig;
use herbtrace::shutdown::ShutdownCoordinator;
use herbtrace::tracker::{ImageAttachment, Stakeholder, StepDraft, TrackerError};
use std::path::Path;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use super::Command;
use crate::cli::output::{print_batch, print_certification, print_coverage, print_steps, print_summary};

pub struct TrackCommand {
    pub config: HerbTraceConfig,
}

/// Line-oriented prompt over stdin
struct Prompt {
    lines: Lines<BufReader<Stdin>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Ask for one line; `None` on end of input
    async fn line(&mut self, label: &str) -> Result<Option<String>> {
        print!("{label}");
        std::io::Write::flush(&mut std::io::stdout())?;
        Ok(self.lines.next_line().await?)
    }

    /// Ask for an optional field; blank answers become `None`
    async fn field(&mut self, label: &str) -> Result<Option<String>> {
        Ok(self
            .line(&format!("   {label}: "))
            .await?
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()))
    }
}

impl Command for TrackCommand {
    async fn execute(&self) -> Result<()> {
        let mut app = App::new(&self.config);
        app.navigate(View::Processing);
        let tracker = app.tracker().clone();

        println!("📦 PROCESSING TRACKER");
        println!("=====================");
        if let Some(batch) = tracker.batch() {
            print_batch(&batch, tracker.completed_steps());
        }
        println!();
        print_help();

        let mut prompt = Prompt::new();
        while let Some(input) = prompt.line("\n> ").await? {
            match input.trim() {
                "" => continue,
                "add" => {
                    let draft = read_draft(&mut prompt).await?;
                    match tracker.submit_step(draft) {
                        Ok(submitted) => println!(
                            "➕ Step {} added, AI verification running...",
                            submitted.step.step_number
                        ),
                        // The form just stays open; nothing is recorded
                        Err(TrackerError::MissingField(_)) => {}
                        Err(e) => println!("{}", e),
                    }
                }
                "list" => print_steps(&tracker.steps()),
                "status" => {
                    if let Some(batch) = tracker.batch() {
                        print_batch(&batch, tracker.completed_steps());
                    }
                    print_summary(&tracker.summary());
                }
                "certify" => match tracker.issue_certification() {
                    Ok(code) => println!("🏷️  Certification issued: {}", code),
                    Err(_) => print_certification(&tracker.summary()),
                },
                "stakeholders" => print_coverage(&tracker.summary()),
                "help" => print_help(),
                "quit" | "exit" => break,
                other => println!("❓ Unknown command '{}'. Type 'help' for options.", other),
            }
        }

        ShutdownCoordinator::new(
            Duration::from_millis(self.config.tracker.verification_delay_ms.saturating_mul(2).max(1000)),
            self.config.observability.metrics_enabled,
        )
        .shutdown(&tracker)
        .await
    }
}

async fn read_draft(prompt: &mut Prompt) -> Result<StepDraft> {
    println!("📝 ADD PROCESSING STEP (blank to skip optional fields)");
    let mut draft = StepDraft::new();
    draft.title = prompt.field("Step title").await?;

    let roles: Vec<String> = Stakeholder::ALL.iter().map(|s| s.to_string()).collect();
    println!("   Stakeholders: {}", roles.join(", "));
    if let Some(answer) = prompt.field("Stakeholder").await? {
        match answer.parse::<Stakeholder>() {
            Ok(stakeholder) => draft.stakeholder = Some(stakeholder),
            Err(e) => println!("   {}", e),
        }
    }

    draft.location = prompt.field("Location").await?;
    draft.description = prompt.field("Description").await?;
    draft.notes = prompt.field("Notes").await?;
    if let Some(images) = prompt.field("Images (comma separated)").await? {
        draft.images = images
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(|p| ImageAttachment::from_path(Path::new(p)))
            .collect();
    }
    Ok(draft)
}

fn print_help() {
    println!("Commands:");
    println!("   add           document a new processing step");
    println!("   list          show all steps");
    println!("   status        batch progress and certification status");
    println!("   certify       issue the batch certification code");
    println!("   stakeholders  which roles have documented steps");
    println!("   quit          leave the tracker");
}
