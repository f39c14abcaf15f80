//! Cosmetic progress indication.
//!
//! The service reports no progress, so while a call is outstanding a ticker
//! makes up an approximation: random increments that stop at a cap, snapped
//! to 100 once the call resolves. Tickers run on their own task and never
//! feed back into the workflow.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::core::ProgressConfig;

/// A source of progress values in percent.
pub trait ProgressTicker: Send {
    /// Advance one step and return the new value.
    fn tick(&mut self) -> f32;

    /// Jump to completion and return the final value.
    fn finish(&mut self) -> f32;

    /// Current value.
    fn value(&self) -> f32;
}

/// Randomized progress capped below completion.
#[derive(Debug, Clone)]
pub struct SimulatedProgress {
    value: f32,
    max_step: f32,
    cap: f32,
    rng: StdRng,
}

impl SimulatedProgress {
    /// Ticker with steps in `[0, max_step)` that never passes `cap`.
    pub fn new(max_step: f32, cap: f32) -> Self {
        Self::with_rng(max_step, cap, StdRng::from_entropy())
    }

    /// Deterministic ticker.
    pub fn with_seed(max_step: f32, cap: f32, seed: u64) -> Self {
        Self::with_rng(max_step, cap, StdRng::seed_from_u64(seed))
    }

    fn with_rng(max_step: f32, cap: f32, rng: StdRng) -> Self {
        Self { value: 0.0, max_step: max_step.max(f32::EPSILON), cap: cap.clamp(0.0, 99.0), rng }
    }

    /// Ticker for text extraction.
    pub fn extraction(config: &ProgressConfig) -> Self {
        Self::new(config.extraction_max_step, config.cap)
    }

    /// Ticker for analysis.
    pub fn analysis(config: &ProgressConfig) -> Self {
        Self::new(config.analysis_max_step, config.cap)
    }
}

impl ProgressTicker for SimulatedProgress {
    fn tick(&mut self) -> f32 {
        if self.value < self.cap {
            let step = self.rng.gen_range(0.0..self.max_step);
            self.value = (self.value + step).min(self.cap);
        }
        self.value
    }

    fn finish(&mut self) -> f32 {
        self.value = 100.0;
        self.value
    }

    fn value(&self) -> f32 {
        self.value
    }
}

/// Ticker that reports nothing until completion.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress {
    done: bool,
}

impl ProgressTicker for NoProgress {
    fn tick(&mut self) -> f32 {
        self.value()
    }

    fn finish(&mut self) -> f32 {
        self.done = true;
        100.0
    }

    fn value(&self) -> f32 {
        if self.done {
            100.0
        } else {
            0.0
        }
    }
}

/// Handle to a ticker running on its own task.
#[derive(Debug)]
pub struct TickerHandle {
    stop: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl TickerHandle {
    /// Stop ticking and report completion.
    pub async fn finish(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::debug!(error = %e, "Progress ticker ended abnormally");
            }
        }
    }
}

impl Drop for TickerHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

/// Drive a ticker on a fixed interval, reporting every value to `on_tick`.
///
/// Must be called from within a tokio runtime. [`TickerHandle::finish`]
/// reports a final 100.
pub fn spawn_ticker<T, F>(mut ticker: T, interval: Duration, mut on_tick: F) -> TickerHandle
where
    T: ProgressTicker + 'static,
    F: FnMut(f32) + Send + 'static,
{
    let (stop_tx, mut stop_rx) = oneshot::channel();

    let task = tokio::spawn(async move {
        let mut interval = tokio::time::interval(interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        // The first tick completes immediately.
        interval.tick().await;
        on_tick(ticker.value());

        loop {
            tokio::select! {
                _ = &mut stop_rx => {
                    on_tick(ticker.finish());
                    break;
                }
                _ = interval.tick() => {
                    on_tick(ticker.tick());
                }
            }
        }
    });

    TickerHandle { stop: Some(stop_tx), task: Some(task) }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;

    #[test]
    fn test_simulated_progress_stays_under_cap() {
        let mut ticker = SimulatedProgress::with_seed(15.0, 90.0, 7);
        let mut last = 0.0;
        for _ in 0..200 {
            let value = ticker.tick();
            assert!(value >= last, "progress went backwards");
            assert!(value <= 90.0);
            last = value;
        }
        assert!(last > 80.0);
        assert_eq!(ticker.finish(), 100.0);
        assert_eq!(ticker.value(), 100.0);
    }

    #[test]
    fn test_cap_never_reaches_completion() {
        let mut ticker = SimulatedProgress::with_seed(50.0, 100.0, 1);
        for _ in 0..100 {
            assert!(ticker.tick() < 100.0);
        }
    }

    #[test]
    fn test_no_progress() {
        let mut ticker = NoProgress::default();
        assert_eq!(ticker.tick(), 0.0);
        assert_eq!(ticker.finish(), 100.0);
        assert_eq!(ticker.tick(), 100.0);
    }

    #[tokio::test]
    async fn test_spawned_ticker_reports_completion() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let handle = spawn_ticker(
            SimulatedProgress::with_seed(10.0, 90.0, 3),
            Duration::from_millis(5),
            move |v| sink.lock().push(v),
        );
        tokio::time::sleep(Duration::from_millis(40)).await;
        handle.finish().await;

        let seen = seen.lock();
        assert!(seen.len() >= 2);
        assert_eq!(seen.last().copied(), Some(100.0));
        assert!(seen[..seen.len() - 1].iter().all(|v| *v <= 90.0));
    }

    #[tokio::test]
    async fn test_dropping_handle_stops_ticker() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();

        let handle =
            spawn_ticker(NoProgress::default(), Duration::from_millis(5), move |v| sink.lock().push(v));
        drop(handle);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert!(!seen.lock().contains(&100.0));
    }
}
