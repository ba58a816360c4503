//! Domain entities - Core objects of the command layer

pub mod user;
pub mod message;
pub mod options;
pub mod comparator;
pub mod command;

pub use user::{User, Member};
pub use message::{Message, Channel, ChannelKind, Guild};
pub use options::{CommandOptions, PermissionRule};
pub use comparator::Comparator;
pub use command::{Aliases, Command, SubCommand};
