use anyhow::{anyhow, bail, Context, Result};
use crossterm::style::Stylize;
use std::path::PathBuf;

use statboard::api::post_board::{NewPost, PostBoardClient};
use statboard::config::config::Config;
use statboard::data::data_exporter::DataExporter;
use statboard::data::data_source::data_source_from_location;
use statboard::data::source_catalog::Selection;
use statboard::services::DataLoaderService;
use statboard::state::{AppState, StateEvent, TableStatus};
use statboard::table_display::{display_posts, display_view};
use statboard::ui::run_tui_app;

fn print_help() {
    println!("{}", "statboard - baseball stats viewer".blue().bold());
    println!();
    println!("{}", "Usage:".yellow());
    println!("  statboard [OPTIONS]");
    println!();
    println!("{}", "Selection:".yellow());
    println!("  {}   - League (AL or NL)", "--league AL|NL".green());
    println!("  {} - Batters or pitchers", "--kind batter|pitcher".green());
    println!("  {}     - Starters or relievers", "--role SP|RP".green());
    println!("  {} - Classic or saber stats", "--mode classic|saber".green());
    println!("  {}   - Filter by player name", "--search TEXT".green());
    println!("  {}   - Sort by a column", "--sort HEADER".green());
    println!("  {}          - Sort descending", "--desc".green());
    println!("  {} - Override the CSV location", "--source DIR|URL".green());
    println!();
    println!("{}", "Modes:".yellow());
    println!("  {}         - Print the table and exit", "--print".green());
    println!("  {}   - Export the table (.csv or .json)", "--export FILE".green());
    println!("  {}         - Print the post board", "--posts".green());
    println!("  {} - Submit a post", "--post TITLE BODY".green());
    println!(
        "  {}   - Initialize configuration with wizard",
        "--init-config".green()
    );
    println!(
        "  {} - Generate config file with defaults",
        "--generate-config".green()
    );
    println!("  {}          - Show this help", "--help".green());
    println!();
    println!("Without a mode flag the interactive viewer starts (F1 for keys).");
}

#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    league: Option<String>,
    kind: Option<String>,
    role: Option<String>,
    mode: Option<String>,
    search: Option<String>,
    sort: Option<String>,
    descending: bool,
    source: Option<String>,
    print: bool,
    export: Option<PathBuf>,
    posts: bool,
    post: Option<(String, String)>,
    init_config: bool,
    generate_config: bool,
    help: bool,
}

fn value_for<'a>(flag: &str, iter: &mut impl Iterator<Item = &'a String>) -> Result<String> {
    iter.next()
        .cloned()
        .ok_or_else(|| anyhow!("{} needs a value", flag))
}

impl CliOptions {
    fn parse(args: &[String]) -> Result<Self> {
        let mut options = CliOptions::default();
        let mut iter = args.iter();

        while let Some(arg) = iter.next() {
            match arg.as_str() {
                "--league" => options.league = Some(value_for(arg, &mut iter)?),
                "--kind" => options.kind = Some(value_for(arg, &mut iter)?),
                "--role" => options.role = Some(value_for(arg, &mut iter)?),
                "--mode" => options.mode = Some(value_for(arg, &mut iter)?),
                "--search" => options.search = Some(value_for(arg, &mut iter)?),
                "--sort" => options.sort = Some(value_for(arg, &mut iter)?),
                "--source" => options.source = Some(value_for(arg, &mut iter)?),
                "--export" => options.export = Some(PathBuf::from(value_for(arg, &mut iter)?)),
                "--post" => {
                    let title = value_for(arg, &mut iter)?;
                    let body = value_for(arg, &mut iter)?;
                    options.post = Some((title, body));
                }
                "--desc" => options.descending = true,
                "--print" => options.print = true,
                "--posts" => options.posts = true,
                "--init-config" => options.init_config = true,
                "--generate-config" => options.generate_config = true,
                "--help" | "-h" => options.help = true,
                other => bail!("Unknown argument '{}'. See --help", other),
            }
        }

        Ok(options)
    }

    /// Config defaults with command line overrides applied
    fn selection(&self, config: &Config) -> Result<Selection> {
        let mut selection = config.defaults.selection()?;
        if let Some(league) = &self.league {
            selection.league = league.parse()?;
        }
        if let Some(kind) = &self.kind {
            selection.category = kind.parse()?;
        }
        if let Some(role) = &self.role {
            selection.role = role.parse()?;
        }
        if let Some(mode) = &self.mode {
            selection.mode = mode.parse()?;
        }
        Ok(selection)
    }
}

fn generate_config() -> Result<()> {
    let path = Config::get_config_path()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).context("Error creating config directory")?;
    }
    std::fs::write(&path, Config::create_default_with_comments())
        .context("Error writing config file")?;
    println!("Configuration file created at: {:?}", path);
    println!("Edit this file to customize statboard.");
    Ok(())
}

/// Load once and apply search and sort, the way the viewer would
fn load_state(loader: &DataLoaderService, selection: Selection, options: &CliOptions) -> AppState {
    let start = AppState::start(selection);
    let generation = start.state.generation();
    let mut state = start
        .state
        .apply(StateEvent::TableLoaded {
            generation,
            outcome: loader.load(&selection),
        })
        .state;

    if let Some(search) = &options.search {
        state = state.apply(StateEvent::SearchChanged(search.clone())).state;
    }
    if let Some(sort) = &options.sort {
        state = state.apply(StateEvent::SortBy(sort.clone())).state;
        if options.descending {
            state = state.apply(StateEvent::SortBy(sort.clone())).state;
        }
    }
    state
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = CliOptions::parse(&args)?;

    if options.help {
        print_help();
        return Ok(());
    }

    if options.init_config {
        let config = Config::init_wizard()?;
        println!("\nConfiguration initialized successfully!");
        if !config.display.use_glyphs {
            println!("Note: Simple mode enabled (ASCII icons)");
        }
        return Ok(());
    }

    if options.generate_config {
        return generate_config();
    }

    statboard::utils::logging::init_tracing();

    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("{}", format!("Using default config: {:#}", e).yellow());
        Config::default()
    });

    if options.posts || options.post.is_some() {
        let client = PostBoardClient::new(&config.posts.url);
        if let Some((title, body)) = &options.post {
            let id = client.create_post(&NewPost::new(title, body)?)?;
            println!("{}", format!("Posted as {}", id).green());
        }
        if options.posts {
            display_posts(&client.fetch_posts()?);
        }
        return Ok(());
    }

    let selection = options.selection(&config)?;
    let base = options.source.as_deref().unwrap_or(&config.sources.base);
    let loader = DataLoaderService::new(data_source_from_location(base), config.catalog());

    if options.print || options.export.is_some() {
        let state = load_state(&loader, selection, &options);
        if let TableStatus::LoadFailed(reason) = state.status() {
            bail!("{}: {}", state.title(), reason);
        }

        let view = state.view();
        if let Some(path) = &options.export {
            println!("{}", DataExporter::export_view(&view, path)?.green());
        }
        if options.print {
            display_view(&state.title(), &view, state.sort(), &config.display.icons);
        }
        return Ok(());
    }

    run_tui_app(
        config,
        loader,
        selection,
        options.search.as_deref().unwrap_or_default(),
    )
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}
