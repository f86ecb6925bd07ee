pub mod entry;
pub mod session;
pub mod span;
pub mod time;
mod util;

pub use entry::*;
pub use session::*;
pub use span::*;
pub use time::*;
pub use util::*;
