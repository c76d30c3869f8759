use log::{error, info, warn};

use crate::notify::Notifier;
use crate::pipeline::{Notes, Preview};

const HEADING: &str = "## Detailed notes:";

/// Render notes as markdown under a fixed heading
pub fn render_text(notes: &Notes) -> String {
    format!("{HEADING}\n\n{}", notes.summary.trim_end())
}

pub fn render_json(notes: &Notes) -> String {
    serde_json::to_string_pretty(notes).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
}

pub fn render_preview(preview: &Preview) -> String {
    format!("Video: {}\nThumbnail: {}", preview.video_id, preview.thumbnail_url)
}

/// Writes status messages to the terminal and mirrors them to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier {
    pub quiet: bool,
}

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) {
        info!("{message}");
        if !self.quiet {
            eprintln!("\x1b[36m{message}\x1b[0m");
        }
    }

    fn warn(&self, message: &str) {
        warn!("{message}");
        eprintln!("\x1b[33mwarning:\x1b[0m {message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
        eprintln!("\x1b[31merror:\x1b[0m {message}");
    }
}
