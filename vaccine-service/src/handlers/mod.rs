pub mod doses;
pub mod system;
pub mod vaccines;

pub use system::{health_check, not_found, root, DOSES_PATH, HEALTH_PATH, VACCINES_PATH};
