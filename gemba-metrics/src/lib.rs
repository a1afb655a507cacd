pub mod parsers;
pub mod protocols;

pub use parsers::*;
pub use protocols::*;
