mod generator;
mod plan;
mod preferences;
mod prompt;
mod repair;

pub mod provider;

pub use generator::*;
pub use plan::*;
pub use preferences::*;
pub use prompt::*;
pub use repair::*;
