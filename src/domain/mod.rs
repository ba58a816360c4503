//! Domain layer - Commands, their options and the client abstraction
//! 
//! This layer contains:
//! - Entities: Commands, messages, users and members
//! - Traits: Abstractions for the platform client and command handlers
//! - Merge: Filling option objects with their defaults

pub mod entities;
pub mod merge;
pub mod traits;
