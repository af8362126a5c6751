#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod parse;
pub mod stats;
pub mod time;

pub use error::Error;
pub use time::Clock;
