pub mod browser;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod harness;
pub mod interaction;
pub mod locators;
pub mod pages;
pub mod report;
pub mod suites;

pub use error::{Error, Result};
