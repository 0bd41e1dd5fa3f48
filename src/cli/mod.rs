mod prompt;
mod server;

pub use prompt::*;
pub use server::*;
