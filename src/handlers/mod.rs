pub mod health;
pub mod root;
pub mod simplify;

pub use health::*;
pub use root::*;
pub use simplify::*;
