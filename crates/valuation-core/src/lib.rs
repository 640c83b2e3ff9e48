pub mod error;
pub mod labels;
pub mod types;

pub use error::*;
pub use labels::*;
pub use types::*;
