// Service exports
pub mod postgres;
pub mod queries;

pub use postgres::{PostgresClient, PostgresError, ABA_CENTER_SUBMISSION, REGIONAL_CENTER_UPDATE};
