// Single-image herb verification mock
//
// Mirrors the dashboard flow: pick an image, start the check, and after a
// fixed delay receive a canned herb profile. No pixels are ever inspected.

pub mod dashboard;

pub use dashboard::{HerbProfile, ImageVerificationStatus, VerificationDashboard};
