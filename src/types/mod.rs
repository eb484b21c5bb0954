mod input;
mod models;
mod status;

pub use input::*;
pub use models::*;
pub use status::*;
