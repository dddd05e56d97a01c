//! Interactive session layer for the LumaKit editing kernel.
//!
//! Wraps the pure transforms in `lumakit-core` with everything a host UI
//! needs: display-space crop geometry, debounced adjustment sessions with
//! baseline revert, text-layer gesture handling, and background-task
//! dispatch with observable lifecycles for load, transform, and export.

pub mod crop;
pub mod debounce;
pub mod editor;
pub mod geometry;
pub mod session;
pub mod slot;
pub mod task;

pub use crop::{fit_aspect_ratio, fit_display, AspectRatio, CropHandle, CropState};
pub use debounce::{Debouncer, DEFAULT_QUIET_PERIOD};
pub use editor::{EditorSession, SessionError};
pub use geometry::{Point, Rect, Size};
pub use session::{AdjustmentSession, ToneValue};
pub use slot::ImageSlot;
pub use task::{BackgroundTask, TaskError, TaskStatus, WorkerPool};
