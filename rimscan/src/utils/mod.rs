pub mod log;
pub mod progress;
pub mod string;

pub use self::log::*;
pub use self::progress::*;
pub use self::string::*;
