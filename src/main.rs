use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};

mod app;
mod keybindings;
mod theme;
mod ui;

use app::App;
use keybindings::KeybindingRegistry;
use postdeck::config::Config;
use postdeck::filter::Category;
use postdeck::listing::{self, CaptureError, Listing, PageKind, MAX_LISTING_SIZE};
use postdeck::report::{self, Report};
use postdeck::view::{Coordinator, ViewState};
use theme::ThemeVariant;

#[derive(Parser, Debug)]
#[command(
    name = "postdeck",
    about = "Search, filter, group by month and paginate a blog dashboard's post listing"
)]
struct Args {
    /// Saved dashboard listing HTML ("-" or absent reads stdin)
    #[arg(value_name = "PAGE")]
    page: Option<PathBuf>,

    /// Config file (default ~/.config/postdeck/config.toml)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override entries per page
    #[arg(long, value_name = "N")]
    page_size: Option<usize>,

    /// Add a starred title (repeatable)
    #[arg(long = "star", value_name = "TITLE")]
    starred: Vec<String>,

    /// Print the rendered view and exit instead of starting the TUI
    #[arg(long)]
    print: bool,

    /// Initial search term
    #[arg(long, value_name = "TERM")]
    search: Option<String>,

    /// Initial category (all|published|drafts|starred)
    #[arg(long, value_name = "NAME")]
    category: Option<String>,

    /// Initial page (clamped to the available pages)
    #[arg(long = "page", value_name = "N", default_value_t = 1)]
    start_page: usize,

    /// With --print, emit the rendered view as JSON
    #[arg(long, requires = "print")]
    json: bool,
}

/// Where the listing HTML comes from.
enum Source<'a> {
    Stdin,
    File(&'a Path),
}

impl<'a> Source<'a> {
    fn from_arg(arg: Option<&'a Path>) -> Self {
        match arg {
            Some(path) if path != Path::new("-") => Self::File(path),
            _ => Self::Stdin,
        }
    }

    fn name(&self) -> String {
        match self {
            Self::Stdin => "stdin".to_string(),
            Self::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
        }
    }

    async fn read(&self) -> Result<String> {
        match self {
            Self::Stdin => read_capped(tokio::io::stdin())
                .await
                .context("Failed to read listing from stdin"),
            Self::File(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open listing '{}'", path.display()))?;
                read_capped(file)
                    .await
                    .with_context(|| format!("Failed to read listing '{}'", path.display()))
            }
        }
    }
}

/// Read at most one byte past `MAX_LISTING_SIZE`, so oversized input is still
/// reported by capture without being buffered whole. Bytes that are not UTF-8
/// (saved pages in legacy encodings) are replaced rather than rejected.
async fn read_capped<R: AsyncRead + Unpin>(reader: R) -> std::io::Result<String> {
    let mut bytes = Vec::new();
    reader
        .take(MAX_LISTING_SIZE as u64 + 1)
        .read_to_end(&mut bytes)
        .await?;
    Ok(match String::from_utf8(bytes) {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(
                valid_up_to = e.utf8_error().valid_up_to(),
                "Listing is not valid UTF-8, replacing invalid bytes"
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    })
}

/// Load the config file and fold the CLI overrides into it.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config.as_deref() {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => match Config::default_path() {
            Some(path) => Config::load(&path).context("Failed to load config")?,
            None => Config::default(),
        },
    };

    if let Some(page_size) = args.page_size {
        if page_size == 0 {
            bail!("--page-size must be at least 1");
        }
        config.page_size = page_size;
    }
    config.starred_titles.extend(args.starred.iter().cloned());
    Ok(config)
}

/// Initial view state from the CLI flags.
fn initial_state(args: &Args) -> Result<ViewState> {
    let category = match args.category.as_deref() {
        Some(name) => Category::from_str_name(name).with_context(|| {
            format!(
                "Unknown category '{}' (expected all, published, drafts or starred)",
                name
            )
        })?,
        None => Category::All,
    };
    Ok(ViewState {
        search_term: args.search.clone().unwrap_or_default(),
        category,
        current_page: args.start_page,
    })
}

/// Capture the listing. Markup the tokenizer gives up on yields an empty
/// listing so the UI can still show "No posts found".
fn capture_listing(html: &str, config: &Config) -> Result<Listing> {
    match listing::capture(html, &config.capture_options()) {
        Ok(listing) => Ok(listing),
        Err(e @ CaptureError::Markup { .. }) => {
            tracing::warn!(error = %e, "Could not read listing markup, showing an empty listing");
            Ok(Listing::empty(PageKind::Other))
        }
        Err(e) => Err(e).context("Failed to capture listing"),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never mix with the TUI or --print output
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let state = initial_state(&args)?;

    let source = Source::from_arg(args.page.as_deref());
    if matches!(source, Source::Stdin) && !args.print {
        bail!("Reading the listing from stdin requires --print (the TUI needs the terminal)");
    }

    let html = source.read().await?;
    let listing = capture_listing(&html, &config)?;
    tracing::info!(
        source = %source.name(),
        kind = ?listing.kind,
        entries = listing.len(),
        "Captured listing"
    );

    if !Category::available(listing.kind).contains(&state.category) {
        tracing::warn!(
            category = state.category.label(),
            "Category not offered on this listing, showing all"
        );
    }

    let coordinator = Coordinator::with_state(listing, config.page_size, state);

    if args.print {
        if args.json {
            let json = Report::new(&coordinator)
                .to_json()
                .context("Failed to serialize view")?;
            println!("{}", json);
        } else {
            print!("{}", report::render_text(&coordinator));
        }
        return Ok(());
    }

    let theme = ThemeVariant::from_str_name(&config.theme).unwrap_or_else(|| {
        tracing::warn!(theme = %config.theme, "Unknown theme, using dark");
        ThemeVariant::Dark
    });

    let mut keybindings = KeybindingRegistry::new();
    let warnings = keybindings.apply_overrides(&config.keybindings);
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    let mut app = App::new(
        coordinator,
        keybindings,
        theme,
        source.name(),
        config.min_width,
    );
    if let Some(first) = warnings.first() {
        app.set_status(format!("Config: {}", first));
    }

    ui::run(&mut app).await?;
    Ok(())
}
