pub mod health;
pub mod watermark;

pub use health::{health_check, metrics_endpoint, readiness_check};
pub use watermark::watermark_image;
