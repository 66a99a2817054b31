#![forbid(unsafe_code)]

pub mod countdown;
pub mod error;
pub mod model;
pub mod navigator;
pub mod time;

pub use countdown::{Countdown, Severity, Tick, format_time};
pub use error::Error;
pub use navigator::QuestionNavigator;
pub use time::Clock;
