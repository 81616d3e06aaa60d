/// Command module - recording targets consumed by the clear path

pub mod command_list;
pub mod batch;

pub use command_list::*;
pub use batch::*;

// Mock recording backend for tests (no GPU required)
#[cfg(test)]
pub mod mock_backend;
