mod codec;
mod id128;
mod id64;
mod interface;
mod nil64;

pub use codec::*;
pub use id64::*;
pub use id128::*;
pub use interface::*;
pub use nil64::*;
