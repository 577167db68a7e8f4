pub mod config;
pub mod torch;

pub use self::config::*;
pub use self::torch::*;
