use std::io::Read;
use std::path::PathBuf;
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use mathboard_core::inline::{self, Segment};
use mathboard_core::{expression_to_latex, parse_reply, typeset, Config, Message, Session, TutorClient, ViewMode};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;

#[derive(Parser)]
#[command(name = "mathboard", version)]
#[command(about = "Terminal math tutor: step-by-step answers on a whiteboard")]
struct Cli {
    /// Tutor backend base URL (overrides the config file and MATHBOARD_URL)
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive tutor (default)
    Tui {
        /// Screen to start on: tutor or chat
        #[arg(short, long)]
        mode: Option<String>,
    },
    /// Ask a single question and print the reply
    Ask {
        /// Your question
        question: String,
        /// Endpoint to ask: tutor (structured) or chat (basic)
        #[arg(short, long, default_value = "tutor")]
        mode: String,
    },
    /// Parse a raw tutor reply from a file (or stdin) without sending anything
    Parse {
        /// File containing the raw reply
        file: Option<PathBuf>,
    },
    /// Show the LaTeX and whiteboard rendering of a math expression
    Latex {
        /// Expression, e.g. "2/3 + 1"
        expression: String,
    },
}

fn parse_mode(s: &str) -> Result<ViewMode> {
    ViewMode::from_str(s).ok_or_else(|| anyhow!("Unknown mode '{}': expected tutor or chat", s))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Reported before the TUI takes over the terminal; the tutor still runs.
    if let Err(e) = logging::init() {
        eprintln!("{}: {:#}", "Logging disabled".yellow(), e);
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "could not read config, using defaults");
        Config::new()
    });
    config = config.with_env();
    if let Some(url) = cli.url {
        config.base_url = Some(url);
    }
    let client = TutorClient::from_config(&config);

    match cli.command {
        None => run_tui(client, config.default_mode()).await,
        Some(Commands::Tui { mode }) => {
            let mode = match mode {
                Some(m) => parse_mode(&m)?,
                None => config.default_mode(),
            };
            run_tui(client, mode).await
        }
        Some(Commands::Ask { question, mode }) => ask(&client, &question, parse_mode(&mode)?).await,
        Some(Commands::Parse { file }) => parse_raw(file),
        Some(Commands::Latex { expression }) => {
            show_latex(&expression);
            Ok(())
        }
    }
}

async fn run_tui(client: TutorClient, mode: ViewMode) -> Result<()> {
    tracing::info!(mode = mode.as_str(), "starting tui");
    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = tui::EventHandler::new();
    let mut app = App::new(client, mode);

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;
            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event).await,
                None => break,
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    if app.has_pending() {
        tracing::info!("quitting with a request still in flight");
    }
    tui::restore()?;
    result
}

async fn ask(client: &TutorClient, question: &str, mode: ViewMode) -> Result<()> {
    let mut session = Session::new(mode);
    session.set_input(question);

    let Some(message) = session.submit() else {
        println!("{}", "Nothing to ask: the question is empty".yellow());
        return Ok(());
    };

    println!("🤖 Asking the {} endpoint...\n", mode.as_str().bold().magenta());
    let outcome = client.send(mode, &message).await;
    if let Err(e) = &outcome {
        tracing::warn!(error = %e, "request failed");
        eprintln!("{} {}", "Request failed:".red(), e);
    }
    session.complete(outcome);

    if let Some(reply) = session.messages().last() {
        print_message(reply);
    }
    Ok(())
}

fn parse_raw(file: Option<PathBuf>) -> Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("Cannot read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    print_message(&Message::AiStructured(parse_reply(&raw)));
    Ok(())
}

fn show_latex(expression: &str) {
    let latex = expression_to_latex(expression);
    let rendered = typeset(expression);

    if rendered.is_plain() {
        println!("{}", "Not a recognised expression; shown as plain text.".yellow());
    }
    println!("{} {}", "LaTeX:".bold().green(), latex);
    println!("\n{}", "Whiteboard:".bold().green());
    for line in rendered.lines() {
        println!("  {}", line);
    }
}

fn print_message(message: &Message) {
    let steps = message.math_steps();
    if !steps.is_empty() {
        println!("{}", "Whiteboard".bold().blue());
        println!("{}", "=".repeat(30).dimmed());
        for (i, step) in steps.iter().enumerate() {
            let number = format!("{}.", i + 1);
            for (row, line) in typeset(step).lines().iter().enumerate() {
                let prefix = if row == 0 { number.clone() } else { " ".repeat(number.len()) };
                println!("{} {}", prefix.bold().yellow(), line);
            }
            println!("   {}", expression_to_latex(step).dimmed());
        }
        println!();
    }

    if matches!(message, Message::AiStructured(_)) {
        println!("{}", "Explanation".bold().blue());
        println!("{}", "=".repeat(30).dimmed());
    }
    println!("{}", render_inline(message.text()));
}

/// Colour `$...$` runs so they stand out in plain terminal output.
fn render_inline(text: &str) -> String {
    inline::segment(text)
        .into_iter()
        .map(|segment| match segment {
            Segment::Text(t) => t,
            Segment::Math(m) => inline::to_unicode(&m).magenta().italic().to_string(),
        })
        .collect()
}
