//! Adaptive difficulty recommendations.
//!
//! Keeps a bounded window of recent attempt outcomes and response
//! times, and suggests when the next question batch should step up or
//! down in difficulty.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Default number of attempts kept in the rolling window.
pub const DEFAULT_WINDOW_SIZE: usize = 10;

/// Minimum recorded attempts before any recommendation other than Hold.
const MIN_SAMPLES: usize = 3;
/// Success rate at or above which difficulty may step up.
const STEP_UP_RATE: f64 = 0.85;
/// Success rate at or below which difficulty steps down.
const STEP_DOWN_RATE: f64 = 0.5;

/// One recorded attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub correct: bool,
    pub time_ms: u32,
}

/// Recommended difficulty adjustment for the next question batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyShift {
    Easier,
    Hold,
    Harder,
}

/// Bounded rolling window of recent attempts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceWindow {
    capacity: usize,
    attempts: VecDeque<AttemptRecord>,
}

impl Default for PerformanceWindow {
    fn default() -> Self {
        PerformanceWindow::new(DEFAULT_WINDOW_SIZE)
    }
}

impl PerformanceWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        PerformanceWindow {
            capacity,
            attempts: VecDeque::with_capacity(capacity),
        }
    }

    /// Record an attempt, evicting the oldest once the window is full.
    pub fn record(&mut self, correct: bool, time_ms: u32) {
        if self.attempts.len() == self.capacity {
            self.attempts.pop_front();
        }
        self.attempts.push_back(AttemptRecord { correct, time_ms });
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Fraction of recorded attempts that were correct.
    pub fn success_rate(&self) -> f64 {
        if self.attempts.is_empty() {
            return 0.0;
        }
        let correct = self.attempts.iter().filter(|attempt| attempt.correct).count();
        correct as f64 / self.attempts.len() as f64
    }

    /// Mean response time across the window.
    pub fn average_time_ms(&self) -> f64 {
        if self.attempts.is_empty() {
            return 0.0;
        }
        let total: u64 = self.attempts.iter().map(|attempt| attempt.time_ms as u64).sum();
        total as f64 / self.attempts.len() as f64
    }

    /// Recommend a difficulty adjustment.
    ///
    /// `expected_time_ms` is the nominal response time for the current
    /// difficulty. A learner who is accurate and faster than that steps
    /// up; one who is inaccurate, or taking more than twice that long,
    /// steps down. With fewer than three samples the recommendation is
    /// always Hold.
    pub fn recommend(&self, expected_time_ms: u32) -> DifficultyShift {
        if self.attempts.len() < MIN_SAMPLES {
            return DifficultyShift::Hold;
        }
        let rate = self.success_rate();
        let average = self.average_time_ms();
        let expected = expected_time_ms as f64;

        if rate >= STEP_UP_RATE && average < expected {
            DifficultyShift::Harder
        } else if rate <= STEP_DOWN_RATE || average > 2.0 * expected {
            DifficultyShift::Easier
        } else {
            DifficultyShift::Hold
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_until_enough_samples() {
        let mut window = PerformanceWindow::default();
        window.record(true, 1000);
        window.record(true, 1000);
        assert_eq!(window.recommend(5000), DifficultyShift::Hold);
    }

    #[test]
    fn fast_and_accurate_steps_up() {
        let mut window = PerformanceWindow::default();
        for _ in 0..5 {
            window.record(true, 1200);
        }
        assert_eq!(window.recommend(3000), DifficultyShift::Harder);
    }

    #[test]
    fn accurate_but_not_fast_holds() {
        let mut window = PerformanceWindow::default();
        for _ in 0..5 {
            window.record(true, 4000);
        }
        assert_eq!(window.recommend(3000), DifficultyShift::Hold);
    }

    #[test]
    fn low_success_rate_steps_down() {
        let mut window = PerformanceWindow::default();
        for i in 0..6 {
            window.record(i % 3 == 0, 2000);
        }
        assert_eq!(window.recommend(3000), DifficultyShift::Easier);
    }

    #[test]
    fn very_slow_answers_step_down_even_when_correct() {
        let mut window = PerformanceWindow::default();
        for _ in 0..4 {
            window.record(true, 7000);
        }
        assert_eq!(window.recommend(3000), DifficultyShift::Easier);
    }

    #[test]
    fn window_evicts_oldest_attempts() {
        let mut window = PerformanceWindow::new(3);
        window.record(false, 9000);
        for _ in 0..3 {
            window.record(true, 1000);
        }
        assert_eq!(window.len(), 3);
        assert!((window.success_rate() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_window_reports_zero() {
        let window = PerformanceWindow::default();
        assert!(window.is_empty());
        assert!(window.success_rate().abs() < f64::EPSILON);
        assert!(window.average_time_ms().abs() < f64::EPSILON);
    }
}
