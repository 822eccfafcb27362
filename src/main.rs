use clap::{Parser, Subcommand};
use serde_json::json;
use site_interactions::headless::HeadlessSite;
use site_interactions::message::{self, SubmissionDraft};
use site_interactions::{config, markup, output, validate};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "site-interactions")]
#[command(about = "Interaction layer for a small marketing site")]
#[command(long_about = "\
Interaction layer for a small marketing site

The page's navigation drawer, image lightbox and contact form are driven by
the WebAssembly build of this crate. This binary works with the same code
headlessly: it checks a config against the markup contract, renders the page,
and runs a contact-form draft through validation and message composition.

Site layout:

  site/
  ├── config.toml        # Contact details, timing, nav links, gallery (optional)
  ├── index.html         # Written by 'render'
  └── pkg/               # wasm-pack --target web output

Run 'site-interactions gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Site directory containing config.toml
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate config and mount every component on the headless page
    Check,
    /// Write the page markup
    Render {
        /// Output file (defaults to <root>/index.html)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Validate a contact-form draft and print the composed message
    Compose {
        /// Draft file (TOML with name, phone, email, service, message, ...)
        #[arg(long)]
        draft: PathBuf,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            let site_config = config::load_config(&cli.root)?;
            let page = HeadlessSite::new(&site_config)?;
            let summary = page.site.summary();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                output::print_check_output(&site_config, &summary);
            }
        }
        Command::Render { output: out } => {
            let site_config = config::load_config(&cli.root)?;
            let html = markup::render_page(&site_config).into_string();
            let path = out.unwrap_or_else(|| cli.root.join("index.html"));
            if let Some(parent) = path.parent()
                && !parent.as_os_str().is_empty()
            {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, &html)?;
            output::print_render_output(&path, html.len());
        }
        Command::Compose { draft } => {
            let site_config = config::load_config(&cli.root)?;
            let draft = SubmissionDraft::load(&draft)?;
            let errors = validate::validate_values(|id| draft.value(id).to_string());
            if !errors.is_empty() {
                if cli.json {
                    let errors: Vec<_> = errors
                        .iter()
                        .map(|(id, msg)| json!({ "field": id, "message": msg }))
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&json!({ "errors": errors }))?);
                } else {
                    output::print_field_errors(&errors);
                }
                std::process::exit(1);
            }
            let composed = message::compose(&draft, &site_config.contact);
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&composed)?);
            } else {
                output::print_composed(&composed);
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
