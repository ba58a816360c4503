//! Platform clients

pub mod console;
