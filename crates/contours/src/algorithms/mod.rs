pub mod preprocessing;
pub mod extraction;
pub mod simplification;
pub mod hull;
pub mod moments;
pub mod fitting;
pub mod quad;

pub use preprocessing::*;
pub use extraction::*;
pub use simplification::*;
pub use hull::*;
pub use moments::*;
pub use fitting::*;
pub use quad::*;
