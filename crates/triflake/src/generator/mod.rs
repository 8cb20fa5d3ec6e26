mod lock;
mod status;

pub use lock::*;
pub use status::*;
