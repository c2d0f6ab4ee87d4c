mod action;
mod app;
mod auth;
mod config;
mod error;
mod event;
mod forge;
mod github;
mod listing;
mod plain;
mod tui;
mod types;
mod ui;
mod view;

use std::panic;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::action::Action;
use crate::app::App;
use crate::config::Config;
use crate::error::error_message;
use crate::event::Event;
use crate::forge::Forge;
use crate::github::GitHub;
use crate::tui::EventHandler;
use crate::types::SortOrder;

#[derive(Debug, Parser)]
#[command(version, about = "List a GitHub user's repositories by stars, in columns")]
struct Cli {
    /// GitHub username whose repositories are listed
    username: String,

    /// Star ordering
    #[arg(long, value_enum, default_value_t = SortOrder::Descending)]
    order: SortOrder,

    /// Print the columns once instead of starting the TUI
    #[arg(long)]
    plain: bool,

    /// With --plain, print JSON
    #[arg(long, requires = "plain")]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Logs go to stderr so they never land in the TUI or in --plain output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load();
    let token = auth::load_token(&config.github);
    let forge: Arc<dyn Forge> = Arc::new(GitHub::new(&config.github, token)?);

    if cli.plain {
        return match plain::run(forge.as_ref(), &cli.username, cli.order, cli.json).await {
            Ok(out) => {
                print!("{}", out);
                Ok(())
            }
            Err(e) => {
                eprintln!("{}", error_message(&e));
                std::process::exit(1);
            }
        };
    }

    // Set up panic hook to restore terminal
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let result = run(forge, cli.username, cli.order).await;

    tui::restore()?;

    result
}

async fn run(
    forge: Arc<dyn Forge>,
    username: String,
    order: SortOrder,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut terminal = tui::init()?;

    let (action_tx, mut action_rx) = mpsc::unbounded_channel::<Action>();
    let mut app = App::new(username, order, forge, action_tx.clone());

    let tick_rate = Duration::from_millis(250);
    let render_rate = Duration::from_millis(16); // ~60fps
    let mut events = EventHandler::new(tick_rate, render_rate);

    loop {
        tokio::select! {
            event = events.next() => {
                // Terminal event stream ended
                let Some(event) = event else {
                    break;
                };
                if event.is_quit() {
                    break;
                }

                match event {
                    Event::Render => {
                        terminal.draw(|frame| ui::render(frame, &app))?;
                    }
                    Event::Tick => app.tick(),
                    _ => {
                        let action = app.handle_event(event);
                        if !matches!(action, Action::None) {
                            action_tx.send(action)?;
                        }
                    }
                }
            }
            Some(action) = action_rx.recv() => {
                app.update(action);
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
