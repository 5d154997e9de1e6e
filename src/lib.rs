pub mod config;
pub mod error_handling;
pub mod metrics;
pub mod models;
pub mod services;
pub mod utils;

pub use error_handling::{InquiryError, Result};
