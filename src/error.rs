// ============================================================================
// EDITOR ERRORS
// ============================================================================

/// Error type for grid, history-boundary and import/export operations.
///
/// Dimension and bounds errors are caller bugs and are always reported, never
/// clamped. Import and decode errors are recoverable: the editor state is left
/// exactly as it was before the call.
#[derive(Debug)]
pub enum EditorError {
    /// Grid dimensions (or export scale) outside the supported range.
    InvalidDimension { rows: usize, cols: usize },
    /// Cell index outside `[0, rows) × [0, cols)`.
    OutOfBounds { row: usize, col: usize, rows: usize, cols: usize },
    /// Zero-area source image.
    InvalidImage(String),
    /// The image decoder rejected the input.
    Decode(String),
    /// Malformed color text at the collaborator boundary.
    InvalidColor(String),
    Io(std::io::Error),
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorError::InvalidDimension { rows, cols } => {
                write!(f, "Invalid grid dimension: {}x{}", cols, rows)
            }
            EditorError::OutOfBounds { row, col, rows, cols } => write!(
                f,
                "Cell ({}, {}) out of bounds for {}x{} grid",
                row, col, cols, rows
            ),
            EditorError::InvalidImage(e) => write!(f, "Invalid image: {}", e),
            EditorError::Decode(e) => write!(f, "Decode error: {}", e),
            EditorError::InvalidColor(e) => write!(f, "Invalid color: {}", e),
            EditorError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EditorError {
    fn from(e: std::io::Error) -> Self {
        EditorError::Io(e)
    }
}

impl From<image::ImageError> for EditorError {
    fn from(e: image::ImageError) -> Self {
        match e {
            image::ImageError::IoError(io) => EditorError::Io(io),
            other => EditorError::Decode(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, EditorError>;
