pub mod emitter;
pub mod extremes;
pub mod logger;

pub use emitter::*;
pub use extremes::*;
pub use logger::*;
