pub mod analytics;
pub mod annotation;
pub mod review;
