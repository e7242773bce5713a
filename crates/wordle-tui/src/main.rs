use tracing::warn;
use wordle_tui::config::Settings;
use wordle_tui::{app, logging};

fn main() {
    let (settings, config_problem) = Settings::load();

    if let Err(e) = logging::init(&settings) {
        eprintln!("Warning: file logging disabled: {}", e);
    }
    if let Some(problem) = config_problem {
        warn!(error = %problem, "ignoring config file");
    }

    if let Err(e) = app::run(settings) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
