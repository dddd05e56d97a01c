//! Editor session facade.
//!
//! One [`EditorSession`] owns the current-image slot, the worker pool,
//! the two adjustment sessions, the crop-mode state, and the text layer
//! store. The host UI feeds it gestures and toolbar actions and polls
//! the background-task handles it returns for load, transform, and
//! export lifecycles.

use std::sync::Arc;
use std::time::Duration;

use lumakit_core::{
    apply_filter, apply_matrix, decode_image_bounded, export as run_export, transform, ColorMatrix,
    ExportSink, FilterKind, LayerEdit, RasterBuffer, TextLayer, TextLayerSet,
};
use thiserror::Error;

use crate::crop::{AspectRatio, CropState};
use crate::debounce::DEFAULT_QUIET_PERIOD;
use crate::geometry::{Point, Rect, Size};
use crate::session::{AdjustmentSession, ToneValue};
use crate::slot::ImageSlot;
use crate::task::{BackgroundTask, TaskError, WorkerPool};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    /// Another adjustment mode holds a baseline; exit it first.
    #[error("Another adjustment mode is already active")]
    ModeActive,

    /// The operation needs a loaded image.
    #[error("No image is loaded")]
    NoImage,
}

pub struct EditorSession {
    slot: ImageSlot,
    pool: WorkerPool,
    tone: AdjustmentSession<ToneValue>,
    filter: AdjustmentSession<FilterKind>,
    layers: TextLayerSet,
    crop: Option<CropState>,
    viewport: Size,
}

impl EditorSession {
    /// Build a session with the standard 300 ms adjustment quiet period.
    pub fn new() -> Result<Self, TaskError> {
        Self::with_quiet_period(DEFAULT_QUIET_PERIOD)
    }

    /// Build a session with an explicit quiet period (tests use short
    /// ones to keep bounded waits small).
    pub fn with_quiet_period(quiet_period: Duration) -> Result<Self, TaskError> {
        let slot = ImageSlot::new();
        let pool = WorkerPool::new()?;
        let tone = AdjustmentSession::new(
            slot.clone(),
            pool.clone(),
            quiet_period,
            ToneValue::default(),
            |base, v: &ToneValue| {
                let m = ColorMatrix::brightness_contrast(v.brightness, v.contrast);
                apply_matrix(base, &m)
            },
        );
        let filter = AdjustmentSession::new(
            slot.clone(),
            pool.clone(),
            quiet_period,
            FilterKind::Original,
            |base, kind: &FilterKind| apply_filter(base, *kind),
        );
        Ok(Self {
            slot,
            pool,
            tone,
            filter,
            layers: TextLayerSet::new(),
            crop: None,
            viewport: Size::default(),
        })
    }

    // ------------------------------------------------------------------
    // Image lifecycle
    // ------------------------------------------------------------------

    /// Decode `bytes` (bounded downsample plus EXIF orientation) on the
    /// worker pool and publish the result as the current image. The
    /// returned handle reports the decoded dimensions.
    pub fn load(&mut self, bytes: Vec<u8>) -> BackgroundTask<(u32, u32)> {
        self.layers.clear();
        self.crop = None;
        let slot = self.slot.clone();
        self.pool.dispatch(move || {
            let image = decode_image_bounded(&bytes, lumakit_core::decode::DEFAULT_TARGET_EDGE)
                .map_err(|e| e.to_string())?;
            let dims = (image.width, image.height);
            slot.publish(Arc::new(image));
            Ok(dims)
        })
    }

    /// Snapshot the current image, if one is loaded.
    pub fn current(&self) -> Option<Arc<RasterBuffer>> {
        self.slot.get()
    }

    /// Record the host viewport; drives display fitting for crop and
    /// text gestures.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        if self.crop.is_some() {
            self.refit_crop();
        }
    }

    /// Fitted placement of the current bitmap inside the viewport.
    pub fn image_display_rect(&self) -> Option<Rect> {
        let image = self.slot.get()?;
        Some(crate::crop::fit_display(
            self.viewport,
            image.width,
            image.height,
        ))
    }

    fn current_or_err(&self) -> Result<Arc<RasterBuffer>, SessionError> {
        self.slot.get().ok_or(SessionError::NoImage)
    }

    // ------------------------------------------------------------------
    // Geometric transforms (toolbar actions)
    // ------------------------------------------------------------------

    /// Lossless quarter turn clockwise.
    pub fn rotate90(&mut self) -> Result<BackgroundTask<()>, SessionError> {
        self.transform_current(|img| transform::rotate90_cw(img))
    }

    /// Arbitrary-angle rotation (positive is clockwise); exact quarter
    /// turns stay lossless.
    pub fn rotate(&mut self, degrees: f64) -> Result<BackgroundTask<()>, SessionError> {
        self.transform_current(move |img| transform::rotate(img, degrees))
    }

    pub fn flip_horizontal(&mut self) -> Result<BackgroundTask<()>, SessionError> {
        self.transform_current(|img| transform::flip_horizontal(img))
    }

    pub fn flip_vertical(&mut self) -> Result<BackgroundTask<()>, SessionError> {
        self.transform_current(|img| transform::flip_vertical(img))
    }

    fn transform_current<F>(&mut self, f: F) -> Result<BackgroundTask<()>, SessionError>
    where
        F: FnOnce(&RasterBuffer) -> RasterBuffer + Send + 'static,
    {
        let image = self.current_or_err()?;
        let slot = self.slot.clone();
        Ok(self.pool.dispatch(move || {
            slot.publish(Arc::new(f(&image)));
            Ok(())
        }))
    }

    // ------------------------------------------------------------------
    // Crop mode
    // ------------------------------------------------------------------

    /// Enter crop mode: fit the bitmap into the recorded viewport and
    /// start with a full-image crop rect.
    pub fn enter_crop_mode(&mut self) -> Result<(), SessionError> {
        let image = self.current_or_err()?;
        self.crop = Some(CropState::new(self.viewport, image.width, image.height));
        Ok(())
    }

    pub fn crop_state(&self) -> Option<&CropState> {
        self.crop.as_ref()
    }

    pub fn crop_begin_drag(&mut self, start: Point) {
        if let Some(crop) = self.crop.as_mut() {
            crop.begin_drag(start);
        }
    }

    pub fn crop_drag_by(&mut self, dx: f32, dy: f32) {
        if let Some(crop) = self.crop.as_mut() {
            crop.drag_by(dx, dy);
        }
    }

    pub fn crop_end_drag(&mut self) {
        if let Some(crop) = self.crop.as_mut() {
            crop.end_drag();
        }
    }

    pub fn set_crop_ratio(&mut self, ratio: AspectRatio) {
        if let Some(crop) = self.crop.as_mut() {
            crop.set_ratio(ratio);
        }
    }

    /// Convert the crop rect to source pixels, run the crop, publish the
    /// result, and leave crop mode.
    pub fn confirm_crop(&mut self) -> Result<BackgroundTask<()>, SessionError> {
        let crop = self.crop.take().ok_or(SessionError::NoImage)?;
        let image = self.current_or_err()?;
        let (x, y, w, h) = crop.pixel_rect();
        let slot = self.slot.clone();
        Ok(self.pool.dispatch(move || {
            slot.publish(Arc::new(transform::crop(&image, x, y, w, h)));
            Ok(())
        }))
    }

    pub fn cancel_crop(&mut self) {
        self.crop = None;
    }

    fn refit_crop(&mut self) {
        if let Some(image) = self.slot.get() {
            if let Some(crop) = self.crop.as_mut() {
                crop.reset(self.viewport, image.width, image.height);
            }
        }
    }

    // ------------------------------------------------------------------
    // Adjustment modes
    // ------------------------------------------------------------------

    /// Enter brightness/contrast mode, snapshotting the current image as
    /// the baseline.
    pub fn enter_tone_mode(&mut self) -> Result<(), SessionError> {
        if self.filter.is_active() {
            return Err(SessionError::ModeActive);
        }
        let image = self.current_or_err()?;
        self.tone.enter(image);
        Ok(())
    }

    pub fn set_tone(&mut self, value: ToneValue) {
        self.tone.set_value(value);
    }

    pub fn exit_tone_mode(&mut self, save: bool) {
        self.tone.exit(save);
    }

    /// Enter filter-preset mode, snapshotting the current image as the
    /// baseline.
    pub fn enter_filter_mode(&mut self) -> Result<(), SessionError> {
        if self.tone.is_active() {
            return Err(SessionError::ModeActive);
        }
        let image = self.current_or_err()?;
        self.filter.enter(image);
        Ok(())
    }

    pub fn set_filter(&mut self, kind: FilterKind) {
        self.filter.set_value(kind);
    }

    pub fn exit_filter_mode(&mut self, save: bool) {
        self.filter.exit(save);
    }

    // ------------------------------------------------------------------
    // Text layers
    // ------------------------------------------------------------------

    pub fn layers(&self) -> &TextLayerSet {
        &self.layers
    }

    /// Add a default layer anchored at the center of the bitmap; it
    /// becomes the selected layer.
    pub fn add_text_layer(&mut self) -> Result<u64, SessionError> {
        let image = self.current_or_err()?;
        let (cx, cy) = image.center();
        Ok(self.layers.add(cx, cy))
    }

    /// Add a default layer at a display-space tap point.
    pub fn add_text_layer_at(&mut self, display: Point) -> Result<u64, SessionError> {
        let anchor = self.display_to_pixel(display)?;
        Ok(self.layers.add(anchor.x, anchor.y))
    }

    /// Apply one named edit to a layer. Unknown ids are silently ignored
    /// so the UI can race a delete against an in-flight gesture.
    pub fn update_text_layer(&mut self, id: u64, edit: LayerEdit) {
        self.layers.update(id, edit);
    }

    /// Drag the selected layer by a display-space delta.
    pub fn drag_selected_text(&mut self, dx: f32, dy: f32) -> Result<(), SessionError> {
        let scale = self.fit_scale()?;
        if let Some(id) = self.layers.selected_id() {
            self.layers.update(
                id,
                LayerEdit::TranslateBy {
                    dx: dx / scale,
                    dy: dy / scale,
                },
            );
        }
        Ok(())
    }

    /// Pinch/rotate gesture on the selected layer: one frame's zoom
    /// factor and rotation delta.
    pub fn pinch_selected_text(&mut self, zoom: f32, rotation_delta: f32) {
        if let Some(id) = self.layers.selected_id() {
            self.layers.update(id, LayerEdit::ScaleFontBy(zoom));
            self.layers.update(id, LayerEdit::RotateBy(rotation_delta));
        }
    }

    pub fn select_text_layer(&mut self, id: Option<u64>) {
        self.layers.select(id);
    }

    pub fn remove_text_layer(&mut self, id: u64) {
        self.layers.remove(id);
    }

    /// Uniform bitmap-to-display scale for the current fit.
    fn fit_scale(&self) -> Result<f32, SessionError> {
        let image = self.current_or_err()?;
        let rect = self
            .image_display_rect()
            .filter(|r| r.width > 0.0)
            .ok_or(SessionError::NoImage)?;
        Ok(rect.width / image.width as f32)
    }

    fn display_to_pixel(&self, display: Point) -> Result<Point, SessionError> {
        let rect = self
            .image_display_rect()
            .filter(|r| r.width > 0.0)
            .ok_or(SessionError::NoImage)?;
        let scale = self.fit_scale()?;
        Ok(Point::new(
            (display.x - rect.left) / scale,
            (display.y - rect.top) / scale,
        ))
    }

    // ------------------------------------------------------------------
    // Export
    // ------------------------------------------------------------------

    /// Flatten text layers into the current image, encode JPEG (quality
    /// 100), and hand the bytes to `sink` on the worker pool. The handle
    /// reports the sink's success token or the failure reason.
    pub fn export<S>(&mut self, mut sink: S) -> Result<BackgroundTask<String>, SessionError>
    where
        S: ExportSink + Send + 'static,
    {
        let image = self.current_or_err()?;
        let layers: Vec<TextLayer> = self.layers.iter().cloned().collect();
        Ok(self.pool.dispatch(move || {
            run_export(&image, layers.iter(), &mut sink).map_err(|e| e.to_string())
        }))
    }
}
