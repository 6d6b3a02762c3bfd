use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;

use stockroom::config::Settings;
use stockroom::shell::{Outcome, Shell};
use stockroom::{Inventory, render};

#[derive(Parser)]
#[command(name = "stockroom")]
#[command(about = "Shop inventory kept in a spreadsheet", long_about = None)]
struct Cli {
    /// Settings file (defaults to ./stockroom.json, then the user config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use a local CSV file as the sheet
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Spreadsheet name
    #[arg(long)]
    spreadsheet: Option<String>,

    /// Sheet (tab) name
    #[arg(long)]
    sheet: Option<String>,

    /// Refuse sales that would take on-hand below zero
    #[arg(long)]
    reject_negative: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the items matching a search and exit
    Show {
        /// Text the product name must contain
        query: Option<String>,
    },
    /// Print per-item profit and the totals, then exit
    Metrics,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run(Cli::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(path) = cli.csv {
        settings.use_csv(path);
    }
    if let Some(name) = cli.spreadsheet {
        settings.spreadsheet = name;
    }
    if let Some(name) = cli.sheet {
        settings.sheet = name;
    }
    if cli.reject_negative {
        settings.allow_negative_stock = false;
    }

    let client = settings.connect()?;
    let inventory = Inventory::load(client, settings.columns.clone(), settings.stock_policy())?;

    match cli.command {
        Some(Commands::Show { query }) => {
            let items = inventory.filter(query.as_deref().unwrap_or(""));
            print!("{}", render::items_table(&items, None));
            println!("{}", render::summary(&inventory.metrics()));
            Ok(())
        }
        Some(Commands::Metrics) => {
            let mut shell = Shell::new(inventory);
            if let Outcome::Continue { output: Some(text), .. } = shell.execute("metrics") {
                println!("{}", text);
            }
            Ok(())
        }
        None => repl(Shell::new(inventory)),
    }
}

fn repl(mut shell: Shell) -> Result<(), Box<dyn std::error::Error>> {
    println!(
        "{} ({} items). Type 'help' for commands.",
        shell.inventory().source(),
        shell.inventory().table().len()
    );

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut start_time = Instant::now();
    let mut status = String::from("ok");

    loop {
        if shell.show {
            println!("{}", shell.view());
        }

        let elapsed_time = start_time.elapsed().as_secs_f64();
        print!("[{:.1}] ({}) > ", elapsed_time, status);
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        start_time = Instant::now();

        match shell.execute(&line) {
            Outcome::Exit => break,
            Outcome::Continue { status: s, output } => {
                if let Some(text) = output {
                    println!("{}", text);
                }
                status = s;
            }
        }
    }

    if shell.inventory().is_dirty() {
        eprintln!("Warning: exiting with unsaved changes");
    }
    Ok(())
}
