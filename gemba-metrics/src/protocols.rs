pub mod registry;
pub mod response_format;
pub mod templates;
pub mod validator;

pub use registry::*;
pub use response_format::*;
pub use validator::*;
