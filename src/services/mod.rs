pub mod analytics;
pub mod notify;
