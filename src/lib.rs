//! Scoped stopwatch for ad-hoc performance logging.
//!
//! ```no_run
//! use gerry::Stopwatch;
//!
//! let mut sw = Stopwatch::named("Load");
//! sw.time(|| std::thread::sleep(std::time::Duration::from_millis(50)))?;
//! // prints "Load took 0.050s"
//! let seconds = sw.seconds()?;
//! # let _ = seconds;
//! # Ok::<(), gerry::StopwatchError>(())
//! ```

pub mod config;
pub mod error;
pub mod output;
pub mod stopwatch;
pub mod template;

pub use config::{Settings, StopwatchConfig};
pub use error::{Result, StopwatchError, TemplateError};
pub use gerry_utils::clock::{Clock, ManualClock, MonotonicClock};
pub use gerry_utils::logger::init_logging;
pub use output::SharedBuffer;
pub use stopwatch::{Running, Stopwatch};
