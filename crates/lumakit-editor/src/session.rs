//! Debounced adjustment sessions.
//!
//! A session snapshots the current image as an immutable baseline on mode
//! entry, then recomputes every preview from that baseline so repeated
//! value changes never compound. Recomputes are debounced and run on the
//! worker pool; results publish straight into the shared image slot.

use std::sync::Arc;
use std::time::Duration;

use lumakit_core::RasterBuffer;
use serde::{Deserialize, Serialize};

use crate::debounce::Debouncer;
use crate::slot::ImageSlot;
use crate::task::WorkerPool;

/// Brightness/contrast pair for the tone session. Neutral is `(0, 0)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ToneValue {
    /// Additive brightness in `[-100, 100]`.
    pub brightness: f32,
    /// Contrast in `[-50, 150]`; `0` is unchanged.
    pub contrast: f32,
}

impl ToneValue {
    pub fn new(brightness: f32, contrast: f32) -> Self {
        Self {
            brightness,
            contrast,
        }
    }
}

type ComputeFn<V> = Arc<dyn Fn(&RasterBuffer, &V) -> RasterBuffer + Send + Sync>;

/// One enter/adjust/exit cycle over a fixed baseline.
///
/// `Idle` until [`enter`](Self::enter) captures a baseline; `exit(false)`
/// restores that baseline as the current image, `exit(true)` keeps the
/// last published preview. Either way the baseline is cleared and the
/// value returns to neutral.
pub struct AdjustmentSession<V> {
    slot: ImageSlot,
    pool: WorkerPool,
    compute: ComputeFn<V>,
    neutral: V,
    value: V,
    baseline: Option<Arc<RasterBuffer>>,
    debouncer: Debouncer,
}

impl<V> AdjustmentSession<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new<F>(
        slot: ImageSlot,
        pool: WorkerPool,
        quiet_period: Duration,
        neutral: V,
        compute: F,
    ) -> Self
    where
        F: Fn(&RasterBuffer, &V) -> RasterBuffer + Send + Sync + 'static,
    {
        Self {
            slot,
            pool,
            compute: Arc::new(compute),
            value: neutral.clone(),
            neutral,
            baseline: None,
            debouncer: Debouncer::new(quiet_period),
        }
    }

    pub fn is_active(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    /// Capture `current` as the baseline and reset the value to neutral.
    /// Entering an already-active session keeps the original baseline.
    pub fn enter(&mut self, current: Arc<RasterBuffer>) {
        if self.baseline.is_none() {
            self.baseline = Some(current);
        }
        self.value = self.neutral.clone();
    }

    /// Store the new value and schedule a preview recompute after the
    /// quiet period. An earlier scheduled-but-not-started recompute is
    /// cancelled, so a burst of changes yields one recompute carrying the
    /// final value.
    pub fn set_value(&mut self, value: V) {
        self.value = value.clone();
        let Some(baseline) = self.baseline.clone() else {
            return;
        };
        let slot = self.slot.clone();
        let pool = self.pool.clone();
        let compute = self.compute.clone();
        self.debouncer.schedule(move || {
            // Fire-and-forget: the result publishes into the slot rather
            // than reporting back to a poller, so the handle is dropped.
            let _ = pool.dispatch(move || {
                let preview = compute(&baseline, &value);
                slot.publish(Arc::new(preview));
                Ok(())
            });
        });
    }

    /// Leave the mode. `save == false` restores the baseline as the
    /// current image; any pending recompute is cancelled either way.
    pub fn exit(&mut self, save: bool) {
        self.debouncer.cancel();
        if let Some(baseline) = self.baseline.take() {
            if !save {
                self.slot.publish(baseline);
            }
        }
        self.value = self.neutral.clone();
    }
}
