//! Scoped wall-clock timing.
//!
//! A [`Stopwatch`] measures exactly one region. [`Stopwatch::start`] returns a
//! [`Running`] guard; the region ends when the guard is stopped or dropped,
//! which also happens on early return and while unwinding from a panic.

use std::io::{self, Stdout, Write};
use std::ops::Deref;
use std::time::{Duration, Instant};

use gerry_utils::clock::{Clock, MonotonicClock};
use tracing::{debug, warn};

use crate::config::{BOUNDARY_MARKER, Settings, StopwatchConfig};
use crate::error::{Result, StopwatchError};
use crate::template;

/// Times one region of code and optionally prints a message when it ends.
#[derive(Debug)]
pub struct Stopwatch<W: Write = Stdout, C: Clock = MonotonicClock> {
    settings: Settings,
    writer: W,
    clock: C,
    start: Option<Instant>,
    elapsed: Option<Duration>,
}

impl Stopwatch {
    /// Stopwatch printing to stdout and timed by the monotonic clock.
    pub fn new(config: StopwatchConfig) -> Self {
        Self::from_parts(config.resolve(), io::stdout(), MonotonicClock)
    }

    /// Shorthand for a stopwatch that prints `"{name} took {:.3f}s"`.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(StopwatchConfig::new().name(name))
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new(StopwatchConfig::default())
    }
}

impl<W: Write, C: Clock> Stopwatch<W, C> {
    pub fn from_parts(settings: Settings, writer: W, clock: C) -> Self {
        Self {
            settings,
            writer,
            clock,
            start: None,
            elapsed: None,
        }
    }

    /// Send output somewhere other than stdout.
    pub fn with_writer<T: Write>(self, writer: T) -> Stopwatch<T, C> {
        Stopwatch {
            settings: self.settings,
            writer,
            clock: self.clock,
            start: self.start,
            elapsed: self.elapsed,
        }
    }

    pub fn with_clock<T: Clock>(self, clock: T) -> Stopwatch<W, T> {
        Stopwatch {
            settings: self.settings,
            writer: self.writer,
            clock,
            start: self.start,
            elapsed: self.elapsed,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn name(&self) -> Option<&str> {
        self.settings.name()
    }

    /// Whether the region has been entered but not yet exited.
    pub fn is_running(&self) -> bool {
        self.start.is_some() && self.elapsed.is_none()
    }

    pub fn is_measured(&self) -> bool {
        self.elapsed.is_some()
    }

    /// Enter the timed region.
    ///
    /// In boundary mode the "starting" notice is written before the clock is
    /// read, so it does not count towards the measurement.
    pub fn start(&mut self) -> Result<Running<'_, W, C>> {
        if self.start.is_some() {
            return Err(StopwatchError::AlreadyStarted);
        }

        if self.settings.print_boundaries() {
            if let Err(err) = self.write_starting() {
                warn!(error = %err, "failed to print stopwatch start notice");
            }
        }

        self.start = Some(self.clock.now());
        debug!(name = self.settings.name(), "stopwatch started");

        Ok(Running { stopwatch: self })
    }

    /// Time `region` and hand back whatever it returned.
    pub fn time<T>(&mut self, region: impl FnOnce() -> T) -> Result<T> {
        let running = self.start()?;
        let output = region();
        running.stop();
        Ok(output)
    }

    pub fn elapsed(&self) -> Result<Duration> {
        self.elapsed.ok_or(StopwatchError::NotMeasured)
    }

    /// Elapsed time in seconds. Repeated calls return the same value.
    pub fn seconds(&self) -> Result<f64> {
        self.elapsed().map(|elapsed| elapsed.as_secs_f64())
    }

    /// The configured message with the measurement substituted.
    pub fn render(&self) -> Result<String> {
        let seconds = self.seconds()?;
        let msg = self.settings.msg();
        template::render(msg, seconds, self.settings.name()).map_err(|source| {
            StopwatchError::Template {
                template: msg.to_owned(),
                source,
            }
        })
    }

    /// Write the rendered message and a line break to the output channel.
    pub fn print_message(&mut self) -> Result<()> {
        let message = self.render()?;
        writeln!(self.writer, "{message}")?;
        self.writer.flush()?;
        Ok(())
    }

    fn write_starting(&mut self) -> io::Result<()> {
        let name = self.settings.name().unwrap_or_default();
        write!(self.writer, "Starting {name}... {BOUNDARY_MARKER} ")?;
        self.writer.flush()
    }

    /// Exit-side bookkeeping. Runs its body at most once and never fails.
    fn finish(&mut self) -> Duration {
        if let Some(elapsed) = self.elapsed {
            return elapsed;
        }
        let elapsed = self
            .start
            .map_or(Duration::ZERO, |start| self.clock.since(start));
        self.elapsed = Some(elapsed);

        debug!(
            name = self.settings.name(),
            elapsed_secs = elapsed.as_secs_f64(),
            "stopwatch stopped"
        );

        if self.settings.should_print() {
            if let Err(err) = self.print_message() {
                warn!(error = %err, "failed to print stopwatch message");
            }
        }

        elapsed
    }
}

impl<W: Write, C: Clock> TryFrom<&Stopwatch<W, C>> for f64 {
    type Error = StopwatchError;

    fn try_from(stopwatch: &Stopwatch<W, C>) -> Result<Self> {
        stopwatch.seconds()
    }
}

/// Guard for a running [`Stopwatch`]. Dropping it ends the region.
#[must_use = "the region ends as soon as the guard is dropped"]
#[derive(Debug)]
pub struct Running<'a, W: Write = Stdout, C: Clock = MonotonicClock> {
    stopwatch: &'a mut Stopwatch<W, C>,
}

impl<W: Write, C: Clock> Running<'_, W, C> {
    /// End the region now and return the measurement.
    pub fn stop(self) -> Duration {
        self.stopwatch.finish()
    }
}

impl<W: Write, C: Clock> Deref for Running<'_, W, C> {
    type Target = Stopwatch<W, C>;

    fn deref(&self) -> &Self::Target {
        self.stopwatch
    }
}

impl<W: Write, C: Clock> Drop for Running<'_, W, C> {
    fn drop(&mut self) {
        self.stopwatch.finish();
    }
}
