use anyhow::Result;
use herbtrace::app::{FEATURES, HEADLINE, PRODUCT_NAME, STAGES, TAGLINE};
use herbtrace::tracker::Stakeholder;

use super::Command;

pub struct LandingCommand;

impl Command for LandingCommand {
    async fn execute(&self) -> Result<()> {
        println!("🌿 {}", PRODUCT_NAME.to_uppercase());
        println!("==========");
        println!("{}", HEADLINE);
        println!();
        println!("Complete traceability from forest collection to consumer sale with AI verification at every step.");
        println!();

        println!("✨ COMPLETE TRACEABILITY SOLUTION:");
        for feature in &FEATURES {
            println!("   • {} - {}", feature.title, feature.description);
        }
        println!();

        println!("🔄 HOW {} WORKS:", PRODUCT_NAME.to_uppercase());
        for stage in &STAGES {
            println!("   {}. {}", stage.step, stage.title);
            println!("      {}", stage.description);
        }
        println!();

        println!("🎯 GET STARTED:");
        println!("   → Verify an herb image: herbtrace verify <IMAGE>");
        println!("   → Track a batch:        herbtrace track");
        println!("   → Watch a full run:     herbtrace demo");
        println!();
        println!("{}", TAGLINE);
        Ok(())
    }
}

pub struct StakeholdersCommand;

impl Command for StakeholdersCommand {
    async fn execute(&self) -> Result<()> {
        println!("👥 SUPPLY CHAIN STAKEHOLDERS:");
        for (i, stakeholder) in Stakeholder::ALL.iter().enumerate() {
            println!("   {}. {}", i + 1, stakeholder);
        }
        Ok(())
    }
}
