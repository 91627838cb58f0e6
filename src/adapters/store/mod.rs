//! Chain store adapters.

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileChainStore;
pub use memory::InMemoryChainStore;
