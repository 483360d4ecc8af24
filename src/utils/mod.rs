pub mod config;
pub mod error;
pub mod hashing;
pub mod helpers;
pub mod uploads;
pub mod validation;
