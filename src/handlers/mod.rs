//! Built-in handlers

pub mod callback;
#[cfg(feature = "console")]
pub mod console;
pub mod file;
pub mod memory;

pub use callback::CallbackHandler;
#[cfg(feature = "console")]
pub use console::ConsoleHandler;
pub use file::{FileHandler, SplitPolicy, DEFAULT_DIRECTORY};
pub use memory::MemoryHandler;
