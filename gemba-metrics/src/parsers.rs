pub mod classes;
pub mod mqm;
pub mod numerical;
pub mod range;
pub mod stars;

pub use classes::*;
pub use mqm::*;
pub use numerical::*;
pub use range::*;
pub use stars::*;
