use clap::Parser;
use pixelgrid::cli::{self, CliArgs};
use pixelgrid::logger;
use pixelgrid::settings::EditorSettings;

fn main() -> std::process::ExitCode {
    // Initialize session log (overwrites previous session log)
    logger::init();

    let settings = EditorSettings::load();
    let args = CliArgs::parse();
    cli::run(args, settings)
}
