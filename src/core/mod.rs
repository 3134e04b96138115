//! Document model, persistence, processing and configuration

pub mod config;
pub mod document;
pub mod file_system;
pub mod model;
pub mod process;
pub mod session;
