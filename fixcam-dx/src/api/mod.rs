//! API handlers for fixcam-dx

pub mod diagnose;
pub mod health;
pub mod projects;
pub mod step_images;

pub use diagnose::diagnose_routes;
pub use health::health_routes;
pub use projects::project_routes;
pub use step_images::step_image_routes;
