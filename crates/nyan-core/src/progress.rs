//! Incrementally steppable work.
//!
//! Long loads (dictionary, level directory scans) are split into steps so a
//! host frame loop can resume them a little at a time. Each resumption
//! reports how far along the work is; counters never go backwards.

use std::time::{Duration, Instant};

/// Progress snapshot reported after each step.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Progress {
    /// Name of the item handled last (file name, kanji, ...).
    pub current: String,
    pub done: usize,
    pub total: usize,
}

impl Progress {
    pub fn new(current: impl Into<String>, done: usize, total: usize) -> Self {
        Self {
            current: current.into(),
            done,
            total,
        }
    }

    /// Completion in `0.0..=1.0`; empty work counts as complete.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            1.0
        } else {
            (self.done as f32 / self.total as f32).min(1.0)
        }
    }
}

/// Outcome of one resumption.
#[derive(Debug)]
pub enum Step<T> {
    /// More work remains.
    Pending(Progress),
    /// Finished; the stepper must not be resumed again.
    Done(T),
}

/// A unit of work driven to completion by repeated [`Stepper::step`] calls.
///
/// Cancelling is just not calling `step` again.
pub trait Stepper {
    type Output;

    fn step(&mut self) -> Step<Self::Output>;

    /// Latest progress, also valid before the first step.
    fn progress(&self) -> Progress;

    /// Run to completion on the current thread.
    fn run(mut self) -> Self::Output
    where
        Self: Sized,
    {
        loop {
            if let Step::Done(output) = self.step() {
                return output;
            }
        }
    }
}

/// Resume `stepper` until it finishes or `budget` has elapsed.
///
/// Returns `Some(output)` once done. At least one step always runs so a
/// zero budget still makes progress.
pub fn drive<S: Stepper>(stepper: &mut S, budget: Duration) -> Option<S::Output> {
    let started = Instant::now();
    loop {
        match stepper.step() {
            Step::Done(output) => return Some(output),
            Step::Pending(progress) => {
                tracing::trace!(
                    "step {}/{} ({})",
                    progress.done,
                    progress.total,
                    progress.current
                );
                if started.elapsed() >= budget {
                    return None;
                }
            }
        }
    }
}
