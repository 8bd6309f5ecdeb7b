// ABOUTME: Main entry point for the deckpilot program.
// ABOUTME: Provides CLI interface and executes commands from the library.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use deckpilot::{
    html, server, Config, Deck, ExportConfig, HtmlRenderer, InputEvent, NavigationState,
    RemoteControl, Session,
};
use parking_lot::Mutex;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the slides, reveal steps and notes of a deck
    Outline(DeckArgs),

    /// Drive a deck from commands read on stdin
    Play(DeckArgs),

    /// Write one HTML page per navigation state
    Export(ExportArgs),

    /// Serve the deck with HTTP remote control
    Serve(ServeArgs),
}

#[derive(Args)]
struct DeckArgs {
    /// Path to the markdown deck
    #[arg(short, long)]
    input: PathBuf,

    /// Reveal top-level list items one at a time
    #[arg(long)]
    animate_list_items: bool,
}

#[derive(Args)]
struct ResourceArgs {
    /// CSS files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    css: Option<Vec<String>>,

    /// JavaScript files to include (local paths or URLs)
    #[arg(long, value_delimiter = ',')]
    js: Option<Vec<String>>,

    /// Mode for CSS/JS: 'embed' to embed content or 'link' to reference
    #[arg(long)]
    mode: Option<String>,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    deck: DeckArgs,

    #[command(flatten)]
    resources: ResourceArgs,

    /// Output directory for the pages
    #[arg(short, long)]
    output: PathBuf,

    /// Prefix for page file names
    #[arg(long, default_value = "slide")]
    base_name: String,
}

#[derive(Args)]
struct ServeArgs {
    #[command(flatten)]
    deck: DeckArgs,

    #[command(flatten)]
    resources: ResourceArgs,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind
    #[arg(long)]
    host: Option<String>,

    /// Reload the deck when the markdown file changes
    #[arg(short, long)]
    watch: bool,
}

fn embed_mode(mode: &Option<String>) -> anyhow::Result<Option<bool>> {
    match mode.as_deref() {
        None => Ok(None),
        Some("embed") => Ok(Some(true)),
        Some("link") => Ok(Some(false)),
        Some(other) => anyhow::bail!("Unknown resource mode '{}', expected 'embed' or 'link'", other),
    }
}

fn load(args: &DeckArgs, config: &Config) -> anyhow::Result<Deck> {
    let options = config.get_load_options(args.animate_list_items);
    deckpilot::load_deck(&args.input, &options)
        .with_context(|| format!("Failed to load deck from {:?}", args.input))
}

fn outline(deck: &Deck) {
    let info = deck.info();
    println!("{}", info.title);
    if !info.author.is_empty() || !info.date.is_empty() {
        println!("{} {}", info.author, info.date);
    }

    for slide in deck.slides() {
        println!(
            "{:>3}. {} [{} steps]{}{}",
            slide.position() + 1,
            slide.title().unwrap_or("(untitled)"),
            slide.reveal_steps(),
            if slide.notes().is_some() { " [notes]" } else { "" },
            if slide.is_bare() { " [bare]" } else { "" },
        );
    }
    println!(
        "{} slides, {} advances from start to end",
        deck.len(),
        deck.total_steps()
    );
}

fn print_state(state: &NavigationState, deck: &Deck) {
    let slide = match deck.get(state.slide_index) {
        Ok(slide) => slide,
        Err(_) => return,
    };
    println!(
        "--- slide {}/{} step {}/{}{} ({:.0}%) ---",
        state.slide_index + 1,
        deck.len(),
        state.reveal_step,
        slide.reveal_steps(),
        if state.fullscreen { " fullscreen" } else { "" },
        deckpilot::progress(state, deck) * 100.0
    );
    println!("{}", html::visible_markdown(slide, state.reveal_step));
}

fn play(deck: Deck) -> anyhow::Result<()> {
    let mut session = Session::new(Arc::new(deck), Box::new(print_state));
    session.render();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read command")?;
        let command = line.trim();
        if command.is_empty() {
            continue;
        }
        if matches!(command, "q" | "quit" | "exit") {
            break;
        }

        let event = match command.parse::<InputEvent>() {
            Ok(event) => event,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match session.handle(event) {
            Ok(true) => {}
            Ok(false) => println!("(no change)"),
            Err(e) => eprintln!("{}", e),
        }
        io::stdout().flush().ok();
    }

    Ok(())
}

fn export(args: &ExportArgs, config: &Config) -> anyhow::Result<()> {
    let deck = load(&args.deck, config)?;
    let export_config = ExportConfig {
        base_name: args.base_name.clone(),
        render: config.get_render_options(
            args.resources.css.clone(),
            args.resources.js.clone(),
            embed_mode(&args.resources.mode)?,
            false,
        ),
    };

    let pages = deckpilot::export_deck(Arc::new(deck), &args.output, &export_config)
        .with_context(|| format!("Failed to export to {:?}", args.output))?;
    println!("Exported {} pages to {:?}", pages.len(), args.output);
    Ok(())
}

fn serve(args: &ServeArgs, config: &Config) -> anyhow::Result<()> {
    let deck = load(&args.deck, config)?;
    let options = config.get_render_options(
        args.resources.css.clone(),
        args.resources.js.clone(),
        embed_mode(&args.resources.mode)?,
        true,
    );

    let renderer = HtmlRenderer::new(options.clone());
    let snapshot = renderer.output();
    let session = Arc::new(Mutex::new(Session::new(Arc::new(deck), Box::new(renderer))));
    let remote = RemoteControl::new(session, snapshot, options);

    if args.watch {
        let watch_config = config.get_watch_config(
            args.deck.input.clone(),
            config.get_load_options(args.deck.animate_list_items),
        );
        deckpilot::spawn_watcher(watch_config, remote.session())?;
    }

    let server_config = config.get_server_config(args.port, args.host.clone());
    server::serve(&server_config, remote)?;
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::from_env();

    let result = match &cli.command {
        Some(Commands::Outline(args)) => load(args, &config).map(|deck| outline(&deck)),
        Some(Commands::Play(args)) => load(args, &config).and_then(play),
        Some(Commands::Export(args)) => export(args, &config),
        Some(Commands::Serve(args)) => serve(args, &config),
        None => {
            println!("No command specified. Use --help for usage information.");
            Ok(())
        }
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
