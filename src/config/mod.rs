//! config/mod.rs
pub mod app_config;
pub mod pdf_config;
