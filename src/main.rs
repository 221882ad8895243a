use clap::{Parser, Subcommand};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::path::PathBuf;
use tomafro_site::{config, generate, output, site::Site, source::FsSource};

fn version_string() -> &'static str {
    let on_tag = env!("ON_RELEASE_TAG");
    if on_tag == "true" {
        env!("CARGO_PKG_VERSION")
    } else {
        let hash = env!("GIT_HASH");
        if hash.is_empty() {
            "dev@unknown"
        } else {
            // Leaked once at startup — trivial, called exactly once
            Box::leak(format!("dev@{hash}").into_boxed_str())
        }
    }
}

#[derive(Parser)]
#[command(name = "tomafro-site")]
#[command(about = "Content collections, pages and feeds for a personal website")]
#[command(long_about = "\
Content collections, pages and feeds for a personal website

Each content kind is a directory of Markdown files with YAML front matter.
The file name is the slug; dated kinds carry the date in the slug.

Content structure:

  content/
  ├── config.toml                      # Site config (optional)
  ├── about.md                         # → /about (optional)
  ├── articles/
  │   └── 2024-03-02-hello-world.md    # → /2024/03/hello-world
  ├── weeknotes/
  │   └── 42.md                        # → /weeknotes/42 (needs a date: field)
  ├── projects/
  │   └── dotfiles.md                  # → /projects/dotfiles (needs a url: field)
  ├── scraps/
  │   └── 2023-09-07-a-quote.md        # → /2023/09/a-quote
  └── stream/
      └── 2024/2024-01-31-link.md      # → /2024/01/link (folders are optional)

Front matter:
  title:        required for every kind
  draft:        true keeps the entry out of pages and feeds
  description:  used in listings and feeds
  tags:         list of strings

Run 'tomafro-site gen-config' to generate a documented config.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    /// Log every loaded kind and written file
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load and validate all content, then list it
    Check,
    /// Print every static path as JSON
    Routes,
    /// Load content and write pages and feeds
    Build,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli);

    match cli.command {
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            config::load_config(&cli.source)?;
            let site = Site::load(&FsSource::new(&cli.source)).await?;
            output::print_load_output(&site);
            println!("==> Content is valid");
        }
        Command::Routes => {
            let site = Site::load(&FsSource::new(&cli.source)).await?;
            output::print_routes(&site)?;
        }
        Command::Build => {
            let site_config = config::load_config(&cli.source)?;

            println!("==> Loading {}", cli.source.display());
            let site = Site::load(&FsSource::new(&cli.source)).await?;
            output::print_load_output(&site);

            println!("==> Generating HTML → {}", cli.output.display());
            let report = generate::generate(&site, &site_config, &cli.output)?;
            output::print_generate_output(&report);

            println!("==> Build complete: {}", cli.output.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Info by default, Debug with `--verbose`. Machine-readable commands stay
/// quiet unless asked.
fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        LevelFilter::Debug
    } else if matches!(cli.command, Command::Routes | Command::GenConfig) {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    // Only fails if a logger is already set
    let _ = SimpleLogger::new().with_level(level).init();
}
