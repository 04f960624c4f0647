use anyhow::Result;
use herbtrace::config::HerbTraceConfig;
use herbtrace::tracker::ImageAttachment;
use herbtrace::verification::VerificationDashboard;
use std::path::PathBuf;

use super::Command;
use crate::cli::output::print_profile;

pub struct VerifyCommand {
    pub image: PathBuf,
    pub config: HerbTraceConfig,
}

impl Command for VerifyCommand {
    async fn execute(&self) -> Result<()> {
        let dashboard = VerificationDashboard::new(self.config.dashboard.verification_delay());
        let image = ImageAttachment::from_path(&self.image);

        println!("📷 HERB VERIFICATION");
        println!("====================");
        match image.size_bytes {
            Some(size) => println!("   Image: {} ({} bytes)", image.file_name, size),
            None => println!("   Image: {}", image.file_name),
        }
        println!();

        dashboard.select_image(image);
        let Some(handle) = dashboard.start_verification() else {
            anyhow::bail!("Verification could not be started");
        };

        print!("🔄 AI Analyzing... ");
        std::io::Write::flush(&mut std::io::stdout())?;
        handle.await?;
        println!("✅");
        println!();

        if let Some(profile) = dashboard.profile() {
            print_profile(&profile);
        }
        println!();
        println!("🚀 NEXT: herbtrace track  # start processing this herb");
        Ok(())
    }
}
