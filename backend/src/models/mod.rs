pub mod display;
pub mod macros;
pub mod schedule;
pub mod time;

pub use display::*;
pub use schedule::*;
pub use time::*;
