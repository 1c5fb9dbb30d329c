// this_file: crates/gridfont-core/src/error.rs

//! Error types shared by the face backends

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FaceError>;

/// Everything that can go wrong between loading a face and landing glyph
/// pixels in an atlas.
///
/// Failures never corrupt an initialized face: a metrics or render error
/// leaves the face in its last-good state and the atlas untouched.
#[derive(Debug, Error)]
pub enum FaceError {
    /// The bytes are not a font the backend can load.
    #[error("font initialization failed")]
    FontInitFailure,

    /// A required table is missing or malformed.
    #[error("font table error: {0}")]
    CopyTable(#[from] gridfont_sfnt::ParseError),

    #[error("failed to apply the requested size")]
    SetSizeFailed,

    /// The atlas pixel format does not match the glyph's color
    /// classification (color glyphs need BGRA, others grayscale).
    #[error("glyph format does not match the atlas format")]
    WrongAtlas,

    /// The backend produced glyph data in a format this pipeline cannot
    /// copy into an atlas.
    #[error("unsupported glyph storage format")]
    UnsupportedGlyphFormat,

    #[error("bitmap glyph decode failed")]
    BitmapHandlingError,

    #[error("failed to resample glyph bitmap to the constrained size")]
    GlyphResizeFailed,

    #[error("glyph rasterization failed")]
    GlyphRenderFailed,

    #[error("atlas has no room for a {width}x{height} region")]
    AtlasFull { width: u32, height: u32 },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
