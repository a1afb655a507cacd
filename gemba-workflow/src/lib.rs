pub mod cache;
pub mod config;
pub mod error;
pub mod provider;
pub mod request;
pub mod scorer;

pub use cache::*;
pub use config::*;
pub use error::*;
pub use provider::*;
pub use request::*;
pub use scorer::*;
