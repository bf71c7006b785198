//! Command handlers for the docqa CLI.

pub mod ask;
pub mod chat;
pub mod classify;
pub mod session;

// Re-export command types for convenience
pub use ask::AskCommand;
pub use chat::ChatCommand;
pub use classify::ClassifyCommand;
