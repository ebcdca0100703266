//! Grid state engine for a pixel-art editor: a cell buffer, snapshot
//! undo/redo, image import by fit-and-center sampling, and scaled export.

pub mod logger;

pub mod canvas;
pub mod cli;
pub mod color;
pub mod components;
pub mod editor;
pub mod error;
pub mod io;
pub mod ops;
pub mod settings;

pub use canvas::PixelBuffer;
pub use color::CellColor;
pub use components::history::HistoryManager;
pub use components::palette::PaletteTracker;
pub use components::tools::{GestureController, GestureState, Tool};
pub use editor::{Editor, ImportOutcome, ImportTicket};
pub use error::{EditorError, Result};
pub use ops::rasterize::SourceImage;
