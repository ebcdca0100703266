// ============================================================================
// pixelgrid CLI — headless image → pixel-art conversion
// ============================================================================
//
// Usage examples:
//   pixelgrid --input photo.png --size 32 --output sprite.png
//   pixelgrid -i *.jpg --size 24 --scale 10 --output-dir sprites/
//   pixelgrid -i logo.png --palette
//
// Each input is decoded, imported into a fresh editor at the requested grid
// size and exported as a scaled bitmap.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;

use crate::editor::Editor;
use crate::io::{DEFAULT_EXPORT_STEM, SaveFormat, encode_and_write, load_source_image};
use crate::settings::EditorSettings;
use crate::{log_err, log_info};

// ============================================================================
// CLI argument definition (clap Derive)
// ============================================================================

/// pixelgrid headless converter.
///
/// Rasterizes images onto a square pixel grid and writes the upscaled result.
#[derive(Parser, Debug)]
#[command(
    name = "pixelgrid",
    about = "Convert images into grid pixel art",
    long_about = "Fit each input image inside an N×N grid (aspect preserved, centered),\n\
                  sample one color per cell and export the grid scaled up as a\n\
                  PNG, BMP, TGA or TIFF.\n\n\
                  Example:\n  \
                  pixelgrid --input photo.png --size 32 --output sprite.png\n  \
                  pixelgrid -i *.jpg --size 24 --scale 10 --output-dir sprites/"
)]
pub struct CliArgs {
    /// Input file(s). Glob patterns accepted (e.g. "*.png", "shots/*.jpg").
    #[arg(short, long, required = true, num_args = 1..)]
    pub input: Vec<String>,

    /// Grid size N (cells per side). Defaults to the configured grid size.
    #[arg(short = 'n', long, value_name = "N")]
    pub size: Option<usize>,

    /// Pixels per cell in the exported bitmap. Defaults to the configured scale.
    #[arg(short, long, value_name = "PX")]
    pub scale: Option<u32>,

    /// Output file path. Only valid for single-file input.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output directory for batch processing.
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Output format: png, bmp, tga, tiff.
    /// When omitted, the format is inferred from --output's extension, defaulting to png.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<String>,

    /// Print the distinct colors used by each converted grid.
    #[arg(short, long)]
    pub palette: bool,

    /// Print per-file timing information.
    #[arg(short, long)]
    pub verbose: bool,

    /// Store the effective --size and --scale as the new defaults.
    #[arg(long)]
    pub save_settings: bool,
}

// ============================================================================
// Public entry point
// ============================================================================

/// Run all CLI processing and return an OS exit code.
/// `0` = all files succeeded, `1` = one or more files failed.
pub fn run(args: CliArgs, settings: EditorSettings) -> ExitCode {
    let inputs = resolve_inputs(&args.input);
    if inputs.is_empty() {
        eprintln!("error: no input files matched the given pattern(s).");
        return ExitCode::FAILURE;
    }

    if inputs.len() > 1 && args.output.is_some() && args.output_dir.is_none() {
        eprintln!(
            "error: {} input files given but --output only accepts a single file path.\n\
             Use --output-dir to specify a destination directory for batch processing.",
            inputs.len()
        );
        return ExitCode::FAILURE;
    }

    let format = parse_format(args.format.as_deref(), args.output.as_deref());
    let grid_size = args.size.unwrap_or(settings.default_grid_size);
    let scale = args.scale.unwrap_or(settings.export_scale);

    if args.save_settings {
        let updated = EditorSettings {
            default_grid_size: grid_size,
            export_scale: scale,
            ..settings.clone()
        };
        if let Err(e) = persist_settings(&updated) {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if let Some(dir) = &args.output_dir
        && let Err(e) = std::fs::create_dir_all(dir)
    {
        eprintln!(
            "error: could not create output directory '{}': {}",
            dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    let total = inputs.len();
    let multi = total > 1;
    let mut any_failure = false;

    for (idx, input_path) in inputs.iter().enumerate() {
        if multi || args.verbose {
            println!("[{}/{}] {}", idx + 1, total, input_path.display());
        }

        let file_start = Instant::now();

        let output_path = build_output_path(
            input_path,
            args.output.as_deref(),
            args.output_dir.as_deref(),
            format,
        );

        match run_one(input_path, &output_path, &settings, grid_size, scale, format) {
            Ok(palette) => {
                if args.palette {
                    println!("  palette ({}): {}", palette.len(), palette.join(" "));
                }
                if args.verbose || multi {
                    println!(
                        "  → {} ({:.0}ms)",
                        output_path.display(),
                        file_start.elapsed().as_secs_f64() * 1000.0
                    );
                }
            }
            Err(e) => {
                log_err!("{}: {}", input_path.display(), e);
                eprintln!("  error: {}", e);
                any_failure = true;
            }
        }
    }

    if any_failure { ExitCode::FAILURE } else { ExitCode::SUCCESS }
}

// ============================================================================
// Per-file processing pipeline
// ============================================================================

/// Returns the canonical palette of the converted grid.
fn run_one(
    input: &Path,
    output: &Path,
    settings: &EditorSettings,
    grid_size: usize,
    scale: u32,
    format: SaveFormat,
) -> Result<Vec<String>, String> {
    // -- Step 1: Decode ---------------------------------------------------
    let source = load_source_image(input).map_err(|e| format!("load failed: {}", e))?;

    // -- Step 2: Rasterize into a fresh grid -----------------------------
    let mut editor = Editor::new(settings.clone()).map_err(|e| e.to_string())?;
    editor
        .set_grid_size(grid_size)
        .map_err(|e| format!("grid size {} rejected: {}", grid_size, e))?;
    editor
        .import(&source)
        .map_err(|e| format!("import failed: {}", e))?;

    // -- Step 3: Export and save -----------------------------------------
    let bitmap = editor
        .export(scale)
        .map_err(|e| format!("export failed: {}", e))?;
    encode_and_write(&bitmap, output, format).map_err(|e| format!("save failed: {}", e))?;

    log_info!("{} → {}", input.display(), output.display());
    Ok(editor.palette_hex())
}

// ============================================================================
// Helpers
// ============================================================================

/// Expand glob patterns and literal paths into a deduplicated, ordered list.
fn resolve_inputs(patterns: &[String]) -> Vec<PathBuf> {
    let mut result: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let as_path = Path::new(pattern);

        if as_path.exists() {
            if !result.iter().any(|p| p.as_path() == as_path) {
                result.push(as_path.to_path_buf());
            }
            continue;
        }

        match glob::glob(pattern) {
            Ok(entries) => {
                let mut matched = false;
                for entry in entries.flatten() {
                    if !result.contains(&entry) {
                        result.push(entry);
                    }
                    matched = true;
                }
                if !matched {
                    eprintln!("warning: pattern '{}' matched no files.", pattern);
                }
            }
            Err(e) => {
                eprintln!("warning: invalid glob '{}': {}", pattern, e);
            }
        }
    }

    result
}

/// Validate and write `settings` to the platform settings file.
fn persist_settings(settings: &EditorSettings) -> Result<(), String> {
    settings
        .validate()
        .map_err(|e| format!("settings not saved: {}", e))?;
    settings
        .save()
        .map_err(|e| format!("could not save settings: {}", e))
}

/// Choose the [`SaveFormat`] from the `--format` string or infer it from the
/// output file extension. Defaults to PNG when neither is known.
fn parse_format(format_arg: Option<&str>, output: Option<&Path>) -> SaveFormat {
    if let Some(f) = format_arg {
        return SaveFormat::from_extension(f).unwrap_or_else(|| {
            let known: Vec<&str> = SaveFormat::all().iter().map(|fmt| fmt.extension()).collect();
            eprintln!(
                "warning: unknown format '{}' (expected one of: {}), using png.",
                f,
                known.join(", ")
            );
            SaveFormat::default()
        });
    }
    output.map(SaveFormat::from_path).unwrap_or_default()
}

/// Compute the output path for a single input file.
///
/// Priority:
/// 1. `--output` (explicit path, used for single-file input)
/// 2. `--output-dir` (batch directory, derives filename from input stem)
/// 3. Fallback: same directory as input, `<stem>_pixel.<ext>`
///
/// Inputs without a file stem are written as `pixel-art.<ext>`.
fn build_output_path(
    input: &Path,
    output: Option<&Path>,
    output_dir: Option<&Path>,
    format: SaveFormat,
) -> PathBuf {
    if let Some(out) = output {
        return out.to_path_buf();
    }

    let ext = format.extension();
    let Some(stem) = input.file_stem().map(|s| s.to_string_lossy().into_owned()) else {
        let dir = output_dir.unwrap_or(Path::new("."));
        return dir.join(format!("{}.{}", DEFAULT_EXPORT_STEM, ext));
    };

    if let Some(dir) = output_dir {
        return dir.join(format!("{}.{}", stem, ext));
    }

    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{}_pixel.{}", stem, ext))
}
