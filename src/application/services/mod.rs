//! Application services

pub mod help_service;

pub use help_service::HelpService;
