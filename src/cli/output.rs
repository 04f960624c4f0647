// Terminal rendering of tracker and dashboard state

use herbtrace::tracker::{HerbBatch, ProcessingStep, StepStatus, TrackerSummary};
use herbtrace::verification::HerbProfile;

pub fn print_batch(batch: &HerbBatch, verified: u32) {
    println!("🌿 BATCH {}", batch.id);
    println!("   Herb: {} ({})", batch.herb_name, batch.scientific_name);
    println!(
        "   Collected by {} at {} on {}",
        batch.collector_name,
        batch.collection_location,
        batch.collection_date.format("%Y-%m-%d")
    );
    println!("   Progress: {}/{} verified steps", verified, batch.total_steps);
}

pub fn print_step(step: &ProcessingStep) {
    let badge = match step.status {
        StepStatus::Verified => format!("✅ AI Verified ({}%)", step.verification_score),
        StepStatus::Pending => "⏳ Verifying...".to_string(),
        StepStatus::InProgress => "🔄 In progress".to_string(),
        StepStatus::Rejected => "❌ Rejected".to_string(),
    };

    println!("{}. {} [{}] {}", step.step_number, step.title, step.stakeholder, badge);
    println!("   {}", step.description);
    if !step.location.is_empty() {
        println!("   📍 {}", step.location);
    }
    if !step.notes.is_empty() {
        println!("   📝 {}", step.notes);
    }
    if !step.images.is_empty() {
        println!("   📸 {} image(s)", step.images.len());
    }
    println!("   🕒 {}", step.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));
}

pub fn print_steps(steps: &[ProcessingStep]) {
    if steps.is_empty() {
        println!("📋 No processing steps yet. Use 'add' to document the first one.");
        return;
    }
    for step in steps {
        print_step(step);
    }
}

pub fn print_summary(summary: &TrackerSummary) {
    println!("📊 PROCESSING STATS:");
    println!("   ✅ Verified: {}", summary.verified);
    println!("   ⏳ Pending: {}", summary.pending);
    println!("   📋 Total steps: {}", summary.total);
    println!(
        "   🎯 Batch progress: {:.0}% ({}/{})",
        summary.batch_progress_percent, summary.verified, summary.total_steps
    );
    print_certification(summary);
}

pub fn print_certification(summary: &TrackerSummary) {
    match &summary.certification_code {
        Some(code) => println!("   🏷️  Certified: {}", code),
        None if summary.steps_until_certification == 0 => {
            println!("   🏷️  Ready for certification (run 'certify')")
        }
        None => println!(
            "   🏷️  Need {} more verified steps for certification ({:.0}%)",
            summary.steps_until_certification, summary.certification_progress_percent
        ),
    }
}

pub fn print_coverage(summary: &TrackerSummary) {
    println!("👥 STAKEHOLDERS:");
    for (role, covered) in &summary.stakeholder_coverage {
        let mark = if *covered { "✅" } else { "⬜" };
        println!("   {} {}", mark, role);
    }
}

pub fn print_profile(profile: &HerbProfile) {
    println!("✅ Verification Complete");
    println!("   Identified herb: {}", profile.name);
    println!("   Scientific name: {}", profile.scientific_name);
    println!("   Quality grade: {}", profile.quality);
    println!("   AI confidence: {}%", profile.confidence);
    println!("   Recommendations:");
    for rec in &profile.recommendations {
        println!("     ✓ {}", rec);
    }
}
