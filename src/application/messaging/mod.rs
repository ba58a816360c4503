//! Message handling - Parsing and routing of incoming messages

pub mod dispatcher;
pub mod parser;

pub use dispatcher::{DispatchOutcome, MessageDispatcher};
pub use parser::{MessageParser, ParsedCommand};
