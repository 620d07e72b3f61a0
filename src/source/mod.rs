//! Record sources for global search.

pub mod adapter;
pub mod memory;

pub use adapter::RecordSource;
pub use memory::InMemSource;
