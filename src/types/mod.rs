pub mod request;
pub mod error;


pub use request::*;
pub use error::*;
