use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use dispersion::config::{load_config, ConfigError};
use dispersion::http::Runtime;
use dispersion::routing::slugify;

#[derive(Parser)]
#[command(name = "dispersion-cli")]
#[command(about = "Inspect and test a Dispersion route configuration", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "dispersion.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration file
    Check,
    /// List compiled routes in priority order
    Routes,
    /// Show how each path would be rewritten and dispatched
    Resolve {
        #[arg(required = true)]
        paths: Vec<String>,
    },
    /// List named links, or print one by name
    Links { name: Option<String> },
    /// Turn a title into a URL segment
    Slug {
        title: String,
        #[arg(short, long)]
        lowercase: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Commands::Slug { title, lowercase } = &cli.command {
        println!("{}", slugify(title, *lowercase));
        return ExitCode::SUCCESS;
    }

    let config = match load_config(&cli.config) {
        Ok(config) => config,
        Err(ConfigError::Validation(errors)) => {
            eprintln!("{}: {} error(s)", cli.config.display(), errors.len());
            for error in errors {
                eprintln!("  {error}");
            }
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("{}: {e}", cli.config.display());
            return ExitCode::FAILURE;
        }
    };

    // Validation already compiled every route.
    let runtime = match Runtime::from_config(&config) {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Check => {
            println!(
                "{}: ok ({} routes)",
                cli.config.display(),
                runtime.table.len()
            );
        }
        Commands::Routes => {
            for (index, rule) in runtime.table.rules().iter().enumerate() {
                let name = runtime.names[index].as_deref().unwrap_or("-");
                println!(
                    "{index:>3}  {name:<16} {} -> {}  (groups: {})",
                    rule.pattern(),
                    rule.rewrite(),
                    rule.pattern().group_count()
                );
            }
        }
        Commands::Resolve { paths } => {
            for path in paths {
                let response = runtime.dispatch(&path, None);
                match serde_json::to_string_pretty(&response) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("{e}");
                        return ExitCode::FAILURE;
                    }
                }
            }
        }
        Commands::Links { name: Some(name) } => match runtime.links.named(&name) {
            Some(url) => println!("{url}"),
            None => {
                eprintln!("no link named `{name}`");
                return ExitCode::FAILURE;
            }
        },
        Commands::Links { name: None } => {
            for (name, url) in runtime.links.named_links() {
                println!("{name:<16} {url}");
            }
        }
        Commands::Slug { .. } => {}
    }

    ExitCode::SUCCESS
}
