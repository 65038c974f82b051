//! Resume refiner library
//!
//! Scores a resume against a job description and drives a small
//! extraction → suggestion → reanalysis workflow over a completion service.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod processing;

#[cfg(test)]
mod test_support;

pub use config::Config;
pub use error::{Result, ResumeRefinerError};
