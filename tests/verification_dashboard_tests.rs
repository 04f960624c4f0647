//! Single-image verification flow, driven through the application root

use herbtrace::config::HerbTraceConfig;
use herbtrace::{App, HerbProfile, ImageAttachment, ImageVerificationStatus, View};
use std::time::Duration;

#[tokio::test(start_paused = true)]
async fn dashboard_verification_resolves_to_fixed_profile() {
    let mut app = App::new(&HerbTraceConfig::default());
    app.navigate(View::Dashboard);
    let dashboard = app.dashboard().clone();

    dashboard.select_image(ImageAttachment::new("leaf.png").with_size(1024));
    let started = tokio::time::Instant::now();
    let handle = dashboard.start_verification().expect("pending image should start");
    handle.await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(3000));
    assert_eq!(dashboard.status(), ImageVerificationStatus::Verified);
    assert_eq!(dashboard.profile(), Some(HerbProfile::tulsi()));
    assert_eq!(dashboard.image().unwrap().file_name, "leaf.png");
}

#[tokio::test(start_paused = true)]
async fn dashboard_state_survives_navigation() {
    let mut app = App::new(&HerbTraceConfig::default());
    app.navigate(View::Dashboard);
    app.dashboard().select_image(ImageAttachment::new("leaf.png"));

    app.navigate(View::Processing);
    app.navigate(View::Dashboard);

    assert_eq!(app.dashboard().status(), ImageVerificationStatus::Pending);
    // Verification does not start twice for the same selection
    let handle = app.dashboard().start_verification().unwrap();
    assert!(app.dashboard().start_verification().is_none());
    handle.await.unwrap();
}
