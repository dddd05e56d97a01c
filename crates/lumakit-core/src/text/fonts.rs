//! Embedded font faces.
//!
//! The five layer font families resolve to DejaVu faces compiled into the
//! binary, so rendering never depends on host font discovery. Each face is
//! parsed once on first use and cached for the life of the process.

use std::sync::OnceLock;

use ab_glyph::FontRef;

use super::layer::FontFamily;

static FONT_SANS: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
static FONT_SERIF: &[u8] = include_bytes!("../../assets/fonts/DejaVuSerif.ttf");
static FONT_MONO: &[u8] = include_bytes!("../../assets/fonts/DejaVuSansMono.ttf");
static FONT_SERIF_ITALIC: &[u8] = include_bytes!("../../assets/fonts/DejaVuSerif-Italic.ttf");

static SANS_FACE: OnceLock<FontRef<'static>> = OnceLock::new();
static SERIF_FACE: OnceLock<FontRef<'static>> = OnceLock::new();
static MONO_FACE: OnceLock<FontRef<'static>> = OnceLock::new();
static SERIF_ITALIC_FACE: OnceLock<FontRef<'static>> = OnceLock::new();

fn cached_face(
    slot: &'static OnceLock<FontRef<'static>>,
    bytes: &'static [u8],
) -> &'static FontRef<'static> {
    // The embedded assets are known-good TTFs; a parse failure here is a
    // build defect, not a runtime condition.
    slot.get_or_init(|| FontRef::try_from_slice(bytes).expect("embedded font is valid"))
}

/// Resolve a font family to its embedded face.
///
/// The cursive family maps to the serif italic face; DejaVu ships no
/// script font.
pub fn font_face(family: FontFamily) -> &'static FontRef<'static> {
    match family {
        FontFamily::Default | FontFamily::Sans => cached_face(&SANS_FACE, FONT_SANS),
        FontFamily::Serif => cached_face(&SERIF_FACE, FONT_SERIF),
        FontFamily::Mono => cached_face(&MONO_FACE, FONT_MONO),
        FontFamily::Cursive => cached_face(&SERIF_ITALIC_FACE, FONT_SERIF_ITALIC),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_glyph::Font;

    #[test]
    fn test_every_family_resolves() {
        for family in FontFamily::ALL {
            let face = font_face(family);
            // A face with no glyphs would be useless for stamping
            assert!(face.glyph_count() > 0);
        }
    }

    #[test]
    fn test_default_and_sans_share_a_face() {
        let a = font_face(FontFamily::Default);
        let b = font_face(FontFamily::Sans);
        assert_eq!(a.glyph_count(), b.glyph_count());
    }

    #[test]
    fn test_faces_parsed_once() {
        for family in FontFamily::ALL {
            assert!(std::ptr::eq(font_face(family), font_face(family)));
        }
    }
}
