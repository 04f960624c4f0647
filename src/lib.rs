// HerbTrace Library - botanical herb supply-chain traceability
// This exposes the core components for testing and integration

pub mod app;
pub mod config;
pub mod observability;
pub mod shutdown;
pub mod telemetry;
pub mod tracker;
pub mod verification;

// Re-export key types for easy access
pub use app::{App, View};
pub use config::{config, init_config, HerbTraceConfig};
pub use observability::{tracker_metrics, OperationTimer, TrackerMetrics};
pub use shutdown::ShutdownCoordinator;
pub use telemetry::{create_session_span, generate_correlation_id, init_telemetry, shutdown_telemetry};
pub use tracker::{
    CertificationError, HerbBatch, ImageAttachment, ProcessingStep, ProcessingTracker,
    Stakeholder, StepDraft, StepStatus, TrackerError, TrackerSummary,
};
pub use verification::{HerbProfile, ImageVerificationStatus, VerificationDashboard};
