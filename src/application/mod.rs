//! Application layer - Routing and errors
//! 
//! This layer contains:
//! - Errors: Error types shared by every layer
//! - Messaging: Message parsing and dispatching to commands
//! - Services: The built-in help renderer

pub mod errors;
pub mod services;
pub mod messaging;
