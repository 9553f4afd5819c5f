pub mod cache;
pub mod money;
pub mod time;

pub use cache::*;
pub use money::*;
pub use time::*;
