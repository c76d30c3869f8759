use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;

use eyre::{Result, bail};
use log::{debug, info, warn};

mod cli;

use cli::{Cli, OutputFormat};
use ytnotes::config::{self, Config, Settings};
use ytnotes::output::{self, ConsoleNotifier};
use ytnotes::session::{self, Command};
use ytnotes::{
    GeminiClient, GenerativeModel, Outcome, Pipeline, Sleeper, Summarizer, TokioSleeper, TranscriptFetcher,
    YouTubeCaptions, pipeline,
};

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytnotes.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytnotes")
        .join("logs")
}

fn build_after_help() -> String {
    let key_line = match config::api_key() {
        Ok(_) => "  \x1b[32m✅\x1b[0m GOOGLE_API_KEY".to_string(),
        Err(_) => "  \x1b[31m❌\x1b[0m GOOGLE_API_KEY (not set; needed to generate notes)".to_string(),
    };

    format!(
        "\nCREDENTIALS:\n{key_line}\n\nConfig is read from: {}\nLogs are written to: {}",
        config::config_path().display(),
        log_dir().join("ytnotes.log").display()
    )
}

fn print_outcome(outcome: &Outcome, format: OutputFormat) -> bool {
    match outcome.notes() {
        Some(notes) => {
            let rendered = match format {
                OutputFormat::Text => output::render_text(notes),
                OutputFormat::Json => output::render_json(notes),
            };
            println!("{rendered}");
            true
        }
        None => false,
    }
}

fn show_preview(url: &str, notifier: &ConsoleNotifier) -> bool {
    match pipeline::preview(url, notifier) {
        Some(preview) => {
            println!("{}", output::render_preview(&preview));
            true
        }
        None => false,
    }
}

async fn run_links<F, G, S>(
    pipeline: &Pipeline<F, G, S>,
    urls: &[String],
    format: OutputFormat,
    notifier: &ConsoleNotifier,
) -> usize
where
    F: TranscriptFetcher,
    G: GenerativeModel,
    S: Sleeper,
{
    let mut failed = 0;
    for url in urls.iter().map(|u| u.trim()).filter(|u| !u.is_empty()) {
        if !show_preview(url, notifier) {
            failed += 1;
            continue;
        }
        let outcome = pipeline.run(url, notifier).await;
        if !print_outcome(&outcome, format) {
            failed += 1;
        }
    }
    failed
}

async fn interactive<F, G, S>(pipeline: &Pipeline<F, G, S>, format: OutputFormat, notifier: &ConsoleNotifier) -> Result<()>
where
    F: TranscriptFetcher,
    G: GenerativeModel,
    S: Sleeper,
{
    eprintln!("Youtube transcript to detailed notes converter");
    eprintln!("{}\n", session::HELP);

    let stdin = io::stdin();
    let mut current: Option<String> = None;

    loop {
        eprint!("> ");
        io::stderr().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match Command::parse(&line) {
            Command::Empty => {}
            Command::Help => eprintln!("{}", session::HELP),
            Command::Quit => break,
            Command::Link(url) => {
                show_preview(&url, notifier);
                current = Some(url);
            }
            Command::Notes(url) => {
                let Some(request) = session::notes_request(url, &mut current, notifier) else {
                    continue;
                };
                if let Some(preview) = &request.preview {
                    println!("{}", output::render_preview(preview));
                }
                let outcome = pipeline.run(&request.url, notifier).await;
                print_outcome(&outcome, format);
            }
        }
    }

    debug!("Session ended");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    if let Err(e) = dotenvy::dotenv() {
        debug!("No .env loaded: {e}");
    }

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let file_config = Config::load().unwrap_or_else(|e| {
        warn!("Ignoring config file: {e}");
        eprintln!("Ignoring config file {}: {e}", config::config_path().display());
        Config::default()
    });
    let settings = Settings::resolve(file_config, cli.overrides())?;

    if cli.verbose {
        eprintln!(
            "Model: {}\nLanguages: {}\nRetries: {} (first wait {:?})",
            settings.model,
            settings.languages.join(", "),
            settings.retry.max_retries,
            settings.retry.initial_delay,
        );
    }

    let notifier = ConsoleNotifier { quiet: !cli.verbose };

    // Links from args, or from stdin when it is piped
    let stdin = io::stdin();
    let urls = if !cli.urls.is_empty() {
        cli.urls.clone()
    } else if !stdin.is_terminal() {
        stdin.lock().lines().collect::<Result<Vec<_>, _>>()?
    } else {
        Vec::new()
    };

    if cli.preview_only {
        if urls.is_empty() {
            bail!("--preview-only needs at least one link");
        }
        for url in urls.iter().filter(|u| !u.trim().is_empty()) {
            show_preview(url, &notifier);
        }
        return Ok(());
    }

    // Fail before any network call if the credential is missing
    let api_key = config::api_key()?;

    let client = reqwest::Client::new();
    let model = GeminiClient::new(client.clone(), api_key, &settings.model, settings.request_timeout);
    let summarizer = Summarizer::new(model, TokioSleeper, settings.retry).with_prompt(&settings.prompt);
    let pipeline = Pipeline::new(YouTubeCaptions::new(client), summarizer, settings.languages.clone());

    if urls.is_empty() {
        return interactive(&pipeline, cli.format, &notifier).await;
    }

    let failed = run_links(&pipeline, &urls, cli.format, &notifier).await;
    if failed > 0 {
        bail!("{failed} of {} link(s) produced no notes", urls.len());
    }

    Ok(())
}
