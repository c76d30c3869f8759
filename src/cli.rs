use clap::Parser;

use ytnotes::config::Overrides;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser)]
#[command(
    name = "ytnotes",
    about = "Turn a YouTube video's transcript into bullet-point notes",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video links (starts an interactive session if omitted)
    pub urls: Vec<String>,

    /// Preferred caption language, in order (repeatable) [default: en, en-US, en-GB]
    #[arg(short, long = "lang", value_name = "LANG")]
    pub langs: Vec<String>,

    /// Gemini model used for summarization [default: gemini-pro]
    #[arg(short, long)]
    pub model: Option<String>,

    /// Output format: text (default), json
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Retries allowed for transient model failures [default: 3]
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Seconds to wait before the first retry, doubled each time [default: 5]
    #[arg(long, value_name = "SECS")]
    pub initial_delay: Option<f64>,

    /// Only show the video thumbnail, do not fetch or summarize
    #[arg(long)]
    pub preview_only: bool,

    /// Show progress messages and config details
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            model: self.model.clone(),
            languages: self.langs.clone(),
            max_retries: self.max_retries,
            initial_delay_secs: self.initial_delay,
        }
    }
}
