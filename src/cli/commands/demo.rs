use anyhow::Result;
use herbtrace::app::{App, View};
use herbtrace::config::HerbTraceConfig;
use herbtrace::observability::OperationTimer;
use herbtrace::shutdown::ShutdownCoordinator;
use herbtrace::tracker::{ImageAttachment, ProcessingTracker, Stakeholder, StepDraft};
use serde_json::json;
use std::time::Duration;

use super::Command;
use crate::cli::output::{print_batch, print_steps, print_summary};

pub struct DemoCommand {
    pub steps: u32,
    pub delay_ms: Option<u64>,
    pub json: bool,
    pub config: HerbTraceConfig,
}

/// What each stakeholder does to the herb in the scripted run
fn scripted_step(stakeholder: Stakeholder) -> (&'static str, &'static str, &'static str) {
    match stakeholder {
        Stakeholder::Collector => (
            "Forest Collection",
            "Leaves hand picked from wild plants at dawn",
            "Himalayan Foothills",
        ),
        Stakeholder::PrimaryProcessor => (
            "Washing & Sorting",
            "Rinsed in spring water, damaged leaves removed",
            "Dehradun Processing Unit",
        ),
        Stakeholder::SecondaryProcessor => (
            "Shade Drying",
            "Dried on mesh racks for four days",
            "Dehradun Processing Unit",
        ),
        Stakeholder::QualityController => (
            "Quality Inspection",
            "Moisture and contaminant checks passed",
            "Haridwar Lab",
        ),
        Stakeholder::Packager => (
            "Packaging",
            "Sealed in food-grade pouches with batch labels",
            "Haridwar Packaging Center",
        ),
        Stakeholder::Distributor => (
            "Regional Distribution",
            "Dispatched in climate controlled transport",
            "Delhi Warehouse",
        ),
        Stakeholder::Wholesaler => (
            "Wholesale Intake",
            "Received and stored for retail orders",
            "Mumbai Market",
        ),
        Stakeholder::Retailer => (
            "Retail Shelf",
            "Stocked for sale to consumers",
            "Mumbai Store",
        ),
    }
}

impl DemoCommand {
    fn effective_config(&self) -> HerbTraceConfig {
        let mut config = self.config.clone();
        if let Some(delay) = self.delay_ms {
            config.tracker.verification_delay_ms = delay;
        }
        config
    }
}

impl Command for DemoCommand {
    async fn execute(&self) -> Result<()> {
        let timer = OperationTimer::new("demo_session");
        let config = self.effective_config();
        let mut app = App::with_tracker(&config, ProcessingTracker::simulated(&config));
        app.navigate(View::Processing);
        let tracker = app.tracker().clone();

        let mut handles = Vec::new();
        for stakeholder in Stakeholder::ALL.iter().copied().cycle().take(self.steps as usize) {
            let (title, description, location) = scripted_step(stakeholder);
            let draft = StepDraft::new()
                .title(title)
                .stakeholder(stakeholder)
                .description(description)
                .location(location)
                .image(ImageAttachment::new(format!(
                    "{}.jpg",
                    title.to_lowercase().replace([' ', '&'], "-")
                )));
            let submitted = tracker.submit_step(draft)?;
            if !self.json {
                println!(
                    "➕ Step {}: {} ({})",
                    submitted.step.step_number, submitted.step.title, stakeholder
                );
            }
            handles.push(submitted.verification);
        }

        if !self.json {
            println!("🔄 Waiting for AI verification of {} step(s)...", handles.len());
        }
        for handle in handles {
            handle.resolved().await;
        }

        let certification = tracker.issue_certification();

        if self.json {
            let summary = tracker.summary();
            let output = json!({
                "batch": tracker.batch(),
                "steps": tracker.steps(),
                "summary": summary,
                "certification": certification.as_ref().ok(),
                "certification_error": certification.as_ref().err().map(|e| e.to_string()),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            println!();
            if let Some(batch) = tracker.batch() {
                print_batch(&batch, tracker.completed_steps());
            }
            println!();
            print_steps(&tracker.steps());
            println!();
            print_summary(&tracker.summary());
            if let Err(e) = &certification {
                println!("   ℹ️  {}", e);
            }
        }

        ShutdownCoordinator::new(
            Duration::from_secs(5),
            config.observability.metrics_enabled,
        )
        .shutdown(&tracker)
        .await?;
        timer.finish();
        Ok(())
    }
}
