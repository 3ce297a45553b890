//! Local storage adapters
//!
//! Key-value stores on the device plus the typed session wrapper on top.

pub mod file;
pub mod memory;
pub mod session;

pub use file::FileStorage;
pub use memory::InMemoryStorage;
pub use session::SessionStore;
