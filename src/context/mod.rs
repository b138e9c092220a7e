pub mod block;
pub mod transfer;

pub use block::*;
pub use transfer::*;
