pub mod annotation;
pub mod answer;
pub mod language;
pub mod prompt;
pub mod segment;

pub use annotation::*;
pub use answer::*;
pub use language::*;
pub use prompt::*;
pub use segment::*;
