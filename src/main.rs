//! Meltgrid - Entry Point
//!
//! Terminal front end for the grid-discovery game. It sets up the async
//! runtime, wires the coordinator to the HTTP simulation backend and the
//! progression save file, and runs a small command loop: pick a level,
//! reveal cells, watch the accuracy climb.

use meltgrid::backend::HttpBackend;
use meltgrid::core::config::GameConfig;
use meltgrid::core::error::Result;
use meltgrid::game::{GameCoordinator, GameView, LevelStatus};
use meltgrid::levels::LevelCatalog;
use meltgrid::progress::ProgressStore;
use meltgrid::render;

use clap::Parser;
use crossterm::style::Stylize;
use std::io::{self, Write};
use std::path::PathBuf;
use tokio::runtime::Runtime;

#[derive(Parser)]
#[command(name = "meltgrid", about = "Grid-discovery game over a thermal simulation backend")]
struct Args {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Simulation backend base URL (overrides config)
    #[arg(long)]
    api_url: Option<String>,

    /// Progression save file (overrides config)
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "meltgrid=info".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => GameConfig::from_file(path)?,
        None => GameConfig::default(),
    }
    .apply_env();
    if let Some(url) = args.api_url {
        config.backend_url = url;
    }
    if let Some(path) = args.save {
        config.save_path = path;
    }
    config.validate()?;

    tracing::info!("Meltgrid starting, backend at {}", config.backend_url);

    let rt = Runtime::new()?;

    let catalog = LevelCatalog::builtin();
    let store = ProgressStore::new(config.save_path.clone(), catalog.len());
    let record = store.load()?;
    let active = record.active;

    let backend_config = config.clone();
    let mut game = GameCoordinator::new(catalog, store, move || {
        HttpBackend::new(&backend_config)
    });

    println!("\n=== MELTGRID ===");
    println!("Reveal the melt pool one cell at a time; beat the level's accuracy score.");
    println!();
    println!("Commands:");
    println!("  levels / l          - List levels with completion badges");
    println!("  play <n> / p <n>    - Start level n");
    println!("  reveal <r> <c> / r  - Reveal the cell at row r, column c (0-based)");
    println!("  reset               - Restart the current level");
    println!("  quit / q            - Exit");
    println!();

    if let Err(e) = rt.block_on(game.start_level(active)) {
        println!("Could not start level {}: {}", active, e);
        println!("Use `play <n>` to retry once the backend is reachable.");
    }

    loop {
        if let Some(view) = game.view() {
            display_board(&view);
        }

        print!("> ");
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();

        if input.is_empty() {
            continue;
        }
        if input == "quit" || input == "q" {
            break;
        }

        if input == "levels" || input == "l" {
            match game.level_statuses() {
                Ok(statuses) => display_levels(&statuses),
                Err(e) => println!("Could not read progress: {}", e),
            }
            continue;
        }

        if input == "reset" {
            if let Err(e) = rt.block_on(game.reset()) {
                println!("Reset failed: {}", e);
            }
            continue;
        }

        if let Some(rest) = input.strip_prefix("play ").or_else(|| input.strip_prefix("p ")) {
            match rest.trim().parse::<u32>() {
                Ok(n) => {
                    if let Err(e) = rt.block_on(game.start_level(n)) {
                        println!("Could not start level {}: {}", n, e);
                    }
                }
                Err(_) => println!("Usage: play <level number>"),
            }
            continue;
        }

        if let Some(rest) = input
            .strip_prefix("reveal ")
            .or_else(|| input.strip_prefix("r "))
        {
            let coords: Vec<_> = rest.split_whitespace().collect();
            match (
                coords.first().and_then(|s| s.parse::<usize>().ok()),
                coords.get(1).and_then(|s| s.parse::<usize>().ok()),
            ) {
                (Some(row), Some(col)) => {
                    if let Err(e) = rt.block_on(game.apply_move(row, col)) {
                        println!("Move failed: {}", e);
                    }
                }
                _ => println!("Usage: reveal <row> <col>"),
            }
            continue;
        }

        println!("Unknown command. Available: levels, play <n>, reveal <r> <c>, reset, quit");
    }

    println!("\nGoodbye!");
    Ok(())
}

/// Print the level-select list with completion and active badges
fn display_levels(statuses: &[LevelStatus]) {
    println!();
    for status in statuses {
        let def = status.definition;
        let badge = if status.completed { "[done]" } else { "      " };
        let marker = if status.active { ">" } else { " " };
        println!(
            "{} Level {} ({}x{}) - Score To Beat: {}% {}",
            marker, def.number, def.grid_size, def.grid_size, def.required_score, badge
        );
    }
    println!();
}

/// Print the board with revealed cells colored by temperature
fn display_board(view: &GameView) {
    println!();
    println!(
        "--- Level {} | Score To Beat: {}% | Your Accuracy: {}% ---",
        view.level,
        view.required_score,
        render::display_accuracy(view.accuracy)
    );

    for row in 0..view.grid_size {
        let mut line = String::new();
        for col in 0..view.grid_size {
            let tile = match view.values[row][col] {
                Some(value) => {
                    let color = render::color_of(value);
                    format!("{:>5}", render::display_temperature(value))
                        .on(crossterm::style::Color::Rgb {
                            r: color.r,
                            g: color.g,
                            b: color.b,
                        })
                        .to_string()
                }
                None if view.revealed[row][col] => format!("{:>5}", "?"),
                None => format!("{:>5}", "."),
            };
            line.push_str(&tile);
            line.push(' ');
        }
        println!("  {}", line);
    }

    if view.complete {
        println!(
            "  Complete! Final accuracy: {}%",
            render::display_accuracy(view.accuracy)
        );
    }
    println!();
}
