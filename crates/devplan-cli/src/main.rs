mod config;
mod generate_cmd;
mod output;
mod render_cmd;
mod renumber_cmd;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use devplan_core::plan::plan_schema_pretty;

#[derive(Parser)]
#[command(
    name = "devplan",
    about = "Turn a project idea into a numbered development plan with implementation prompts"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a devplan config file
    Init {
        /// OpenRouter API key to store in the config file
        #[arg(long)]
        api_key: Option<String>,
        /// Default model to store in the config file
        #[arg(long)]
        model: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate a development plan from a project idea
    Generate {
        /// High-level project idea
        idea: Option<String>,
        /// Output file (defaults to <plans_dir>/development_plan.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Model to use (overrides OPENROUTER_MODEL and the config file)
        #[arg(short, long)]
        model: Option<String>,
        /// Skip generating per-task implementation prompts
        #[arg(long)]
        skip_prompts: bool,
        /// Pause between task-prompt requests, in milliseconds
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,
    },
    /// Render a plan JSON file as HTML and Markdown
    Render {
        /// Path to the plan JSON file
        file: PathBuf,
        /// HTML output file (defaults to <docs_dir>/<plan name>.html)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Re-apply canonical task numbering to a plan JSON file
    Renumber {
        /// Path to the plan JSON file
        file: PathBuf,
        /// Output file (defaults to rewriting the input in place)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the plan JSON Schema
    Schema,
}

/// Execute the `devplan init` command: write config file.
fn cmd_init(api_key: Option<&str>, model: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        openrouter: config::OpenRouterSection {
            api_key: api_key.map(str::to_string),
            model: model.map(str::to_string),
            ..Default::default()
        },
        ..Default::default()
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    match api_key {
        Some(key) => println!("  openrouter.api_key = {}", mask_secret(key)),
        None => println!("  openrouter.api_key not set (use {})", config::API_KEY_ENV),
    }
    if let Some(model) = model {
        println!("  openrouter.model = {model}");
    }
    println!();
    println!("Next: run `devplan generate \"<your idea>\"`.");

    Ok(())
}

/// Show only the ends of a secret.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            api_key,
            model,
            force,
        } => {
            cmd_init(api_key.as_deref(), model.as_deref(), force)?;
        }
        Commands::Generate {
            idea,
            output,
            model,
            skip_prompts,
            delay_ms,
        } => {
            let options = generate_cmd::GenerateOptions {
                output,
                model,
                skip_prompts,
                delay: std::time::Duration::from_millis(delay_ms),
            };
            generate_cmd::run_generate(idea.as_deref(), &options).await?;
        }
        Commands::Render { file, output } => {
            render_cmd::run_render(&file, output.as_deref())?;
        }
        Commands::Renumber { file, output } => {
            renumber_cmd::run_renumber(&file, output.as_deref())?;
        }
        Commands::Schema => {
            println!("{}", plan_schema_pretty());
        }
    }

    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_secret_keeps_ends() {
        assert_eq!(mask_secret("sk-or-v1-abcdef123456"), "sk-o...3456");
        assert_eq!(mask_secret("short"), "*****");
    }

    #[test]
    fn cli_parses_generate_flags() {
        let cli = Cli::try_parse_from([
            "devplan",
            "generate",
            "a todo app",
            "-o",
            "out.json",
            "--skip-prompts",
            "--delay-ms",
            "0",
        ])
        .unwrap();
        match cli.command {
            Commands::Generate {
                idea,
                output,
                model,
                skip_prompts,
                delay_ms,
            } => {
                assert_eq!(idea.as_deref(), Some("a todo app"));
                assert_eq!(output, Some(PathBuf::from("out.json")));
                assert_eq!(model, None);
                assert!(skip_prompts);
                assert_eq!(delay_ms, 0);
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn cli_requires_render_file() {
        assert!(Cli::try_parse_from(["devplan", "render"]).is_err());
    }
}
