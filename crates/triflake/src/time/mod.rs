mod interface;
mod mono_clock;
mod system_clock;
mod wait;

pub use interface::*;
pub use mono_clock::*;
pub use system_clock::*;
pub use wait::*;
