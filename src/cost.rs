//! Cost instrumentation: step counters and wall-clock measurement

use std::fmt;
use std::time::{Duration, Instant};

use log::debug;
use serde::Serialize;

use crate::{base::AttributeValue, error::Result};

/// Counts the work performed by a top-k strategy
///
/// `steps` is the figure used to compare strategies; the other counters
/// break the work down by access type.
#[derive(Serialize, Clone, Debug, Default, PartialEq)]
pub struct StepCounter {
    steps: u64,
    rounds: u64,
    sorted_accesses: u64,
    random_accesses: u64,
    threshold: Option<AttributeValue>,
}

impl StepCounter {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn step(&mut self) {
        self.steps += 1;
    }

    /// A sorted access round has been completed (counts as one step)
    #[inline]
    pub fn round(&mut self) {
        self.rounds += 1;
        self.steps += 1;
    }

    #[inline]
    pub fn sorted_access(&mut self) {
        self.sorted_accesses += 1;
    }

    /// A row has been scored from its full data
    #[inline]
    pub fn random_access(&mut self) {
        self.random_accesses += 1;
    }

    pub fn set_threshold(&mut self, threshold: AttributeValue) {
        self.threshold = Some(threshold);
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn rounds(&self) -> u64 {
        self.rounds
    }

    pub fn sorted_accesses(&self) -> u64 {
        self.sorted_accesses
    }

    pub fn random_accesses(&self) -> u64 {
        self.random_accesses
    }

    /// Last threshold computed by the threshold algorithm
    pub fn threshold(&self) -> Option<AttributeValue> {
        self.threshold
    }
}

impl fmt::Display for StepCounter {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "steps: {}, rounds: {}, sorted: {}, random: {}",
            self.steps, self.rounds, self.sorted_accesses, self.random_accesses
        )
    }
}

/// Result of a measured call
pub struct Measured<T> {
    pub result: T,
    pub elapsed: Duration,
    pub counter: StepCounter,
}

impl<T> Measured<T> {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.
    }

    pub fn steps(&self) -> u64 {
        self.counter.steps()
    }
}

/// Runs `f` with a fresh counter and measures its wall-clock time
pub fn measure<T, F>(f: F) -> Result<Measured<T>>
where
    F: FnOnce(&mut StepCounter) -> Result<T>,
{
    let mut counter = StepCounter::new();
    let start = Instant::now();
    let result = f(&mut counter)?;
    let elapsed = start.elapsed();

    debug!("Measured {:?} ({})", elapsed, counter);
    Ok(Measured {
        result,
        elapsed,
        counter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_measure() {
        let measured = measure(|counter| {
            counter.round();
            counter.step();
            counter.sorted_access();
            Ok(42)
        })
        .unwrap();

        assert_eq!(measured.result, 42);
        assert_eq!(measured.steps(), 2);
        assert_eq!(measured.counter.rounds(), 1);
        assert_eq!(measured.counter.sorted_accesses(), 1);
        assert!(measured.elapsed_ms() >= 0.);
    }

    #[test]
    fn test_measure_error() {
        let measured: Result<Measured<()>> = measure(|_| Err(Error::EmptyAggregation));
        assert!(matches!(measured, Err(Error::EmptyAggregation)));
    }
}
