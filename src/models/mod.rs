// Re-export model modules
mod countries;
mod timestamp;

pub use countries::*;
pub use timestamp::*;
