pub mod typed_data;
pub mod recovery;
pub mod verifier;
pub mod replay;


pub use typed_data::*;
pub use recovery::*;
pub use verifier::*;
pub use replay::*;
