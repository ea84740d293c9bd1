pub mod config;
pub mod error;
pub mod forks;
pub mod http;
pub mod owners;
pub mod rate_limit;
pub mod report;
pub mod repos;
pub mod session;
pub mod stars;
pub mod stats;
pub mod types;

pub use config::Config;
pub use error::{Error, Result};
pub use rate_limit::{check_quota, evaluate, Quota, QuotaLevel};
pub use session::Session;
