//! Text layer descriptors and the copy-on-write layer store.

use serde::{Deserialize, Serialize};

/// Smallest allowed font size in source pixels.
pub const MIN_FONT_SIZE: f32 = 10.0;
/// Largest allowed font size in source pixels.
pub const MAX_FONT_SIZE: f32 = 500.0;

const DEFAULT_TEXT: &str = "New Text";
const DEFAULT_FONT_SIZE: f32 = 80.0;

/// The closed set of font families a layer may use. Resolution to an
/// actual font face happens at the rendering boundary only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FontFamily {
    #[default]
    Default,
    Serif,
    Sans,
    Mono,
    Cursive,
}

impl FontFamily {
    /// Every family in the order a style panel shows them.
    pub const ALL: [FontFamily; 5] = [
        FontFamily::Default,
        FontFamily::Serif,
        FontFamily::Sans,
        FontFamily::Mono,
        FontFamily::Cursive,
    ];
}

/// A floating text overlay.
///
/// `x`/`y` are the layer's anchor in source-bitmap pixel coordinates; the
/// glyph run is centered on that point at render time. Rotation is in
/// degrees, normalized to [0, 360).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLayer {
    pub id: u64,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font_size: f32,
    /// RGBA fill color.
    pub color: [u8; 4],
    pub rotation: f32,
    pub scale: f32,
    pub alpha: f32,
    pub font_family: FontFamily,
}

impl TextLayer {
    /// New layer with default style, anchored at `(x, y)`.
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self {
            id,
            text: DEFAULT_TEXT.to_string(),
            x,
            y,
            font_size: DEFAULT_FONT_SIZE,
            color: [255, 255, 255, 255],
            rotation: 0.0,
            scale: 1.0,
            alpha: 1.0,
            font_family: FontFamily::Default,
        }
    }

    /// Return a copy with the edit applied, clamping as needed.
    pub fn edited(&self, edit: LayerEdit) -> Self {
        let mut layer = self.clone();
        match edit {
            LayerEdit::SetText(text) => layer.text = text,
            LayerEdit::SetPosition { x, y } => {
                layer.x = x;
                layer.y = y;
            }
            LayerEdit::TranslateBy { dx, dy } => {
                layer.x += dx;
                layer.y += dy;
            }
            LayerEdit::SetFontSize(size) => {
                layer.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
            }
            LayerEdit::ScaleFontBy(zoom) => {
                layer.font_size = (layer.font_size * zoom).clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
            }
            LayerEdit::SetColor(color) => layer.color = color,
            LayerEdit::SetRotation(degrees) => {
                layer.rotation = normalize_degrees(degrees);
            }
            LayerEdit::RotateBy(delta) => {
                layer.rotation = normalize_degrees(layer.rotation + delta);
            }
            LayerEdit::SetAlpha(alpha) => layer.alpha = alpha.clamp(0.0, 1.0),
            LayerEdit::SetFontFamily(family) => layer.font_family = family,
        }
        layer
    }
}

/// Named mutation intents applied through [`TextLayerSet::update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayerEdit {
    SetText(String),
    SetPosition { x: f32, y: f32 },
    TranslateBy { dx: f32, dy: f32 },
    SetFontSize(f32),
    ScaleFontBy(f32),
    SetColor([u8; 4]),
    SetRotation(f32),
    RotateBy(f32),
    SetAlpha(f32),
    SetFontFamily(FontFamily),
}

fn normalize_degrees(degrees: f32) -> f32 {
    (degrees % 360.0 + 360.0) % 360.0
}

/// Ordered, copy-on-write collection of text layers.
///
/// Render order equals insertion order; the first layer added is drawn
/// first and later layers composite on top. Ids are assigned
/// monotonically and never reused within a set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextLayerSet {
    layers: Vec<TextLayer>,
    next_id: u64,
    selected: Option<u64>,
}

impl TextLayerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a layer anchored at `(x, y)`, append it, select it, and
    /// return its id.
    pub fn add(&mut self, x: f32, y: f32) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.layers.push(TextLayer::new(id, x, y));
        self.selected = Some(id);
        id
    }

    /// Apply an edit to the layer with the given id by copy-replace.
    /// Unknown ids are a silent no-op; the UI may race a delete against
    /// an in-flight update.
    pub fn update(&mut self, id: u64, edit: LayerEdit) {
        if let Some(slot) = self.layers.iter_mut().find(|l| l.id == id) {
            *slot = slot.edited(edit);
        }
    }

    /// Remove the layer with the given id. Unknown ids are a silent
    /// no-op. A removed selection is cleared.
    pub fn remove(&mut self, id: u64) {
        self.layers.retain(|l| l.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
    }

    /// Drop every layer and the selection.
    pub fn clear(&mut self) {
        self.layers.clear();
        self.selected = None;
    }

    /// Select a layer, or pass `None` to deselect. Selecting an unknown
    /// id clears the selection.
    pub fn select(&mut self, id: Option<u64>) {
        self.selected = id.filter(|id| self.layers.iter().any(|l| l.id == *id));
    }

    pub fn selected_id(&self) -> Option<u64> {
        self.selected
    }

    pub fn selected(&self) -> Option<&TextLayer> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn get(&self, id: u64) -> Option<&TextLayer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Layers in render order.
    pub fn iter(&self) -> impl Iterator<Item = &TextLayer> {
        self.layers.iter()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}
