//! Silicon Sampling - main CLI entry point

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use serde_json::Value;
use silicon_sampling::{
    cli::{Args, Commands, Config},
    logging::init_logging,
    server::serve_stdio,
    Bootstrap,
};
use tracing::debug;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(args.config.clone()).context("Failed to load configuration")?;
    args.apply_overrides(&mut config);
    init_logging(&args.log_level(&config));
    debug!(?config, "Configuration loaded");

    match args.command() {
        Commands::Serve => {
            let boot = Bootstrap::from_config(&config)?;
            serve_stdio(&boot.handler()).await?;
        }
        Commands::Personas => list_personas(&Bootstrap::from_config(&config)?),
        Commands::Skills => list_skills(&Bootstrap::from_config(&config)?),
        Commands::Status => show_status(&Bootstrap::from_config(&config)?)?,
        Commands::Call {
            tool,
            args: raw_args,
            persona,
        } => {
            let boot = Bootstrap::from_config(&config)?;
            call_tool(&boot, &tool, raw_args.as_deref(), persona.as_deref())?;
        }
        Commands::Config => show_config(&args, &config)?,
    }

    Ok(())
}

fn list_personas(boot: &Bootstrap) {
    let personas = boot.engine().list_personas();
    println!("{} ({})", "Personas".bold(), personas.len());

    if personas.is_empty() {
        println!("  {}", "No personas found".yellow());
        return;
    }

    for persona in personas {
        println!(
            "  {} {} {}",
            persona.id.cyan(),
            persona.name,
            format!("- {}", persona.summary).dimmed()
        );
    }
}

fn list_skills(boot: &Bootstrap) {
    let skills = boot.engine().skills().list();
    println!("{} ({})", "Skills".bold(), skills.len());
    for name in skills {
        println!("  {}", name.cyan());
    }
}

fn show_status(boot: &Bootstrap) -> Result<()> {
    let status = boot.engine().status();
    println!("{}", "Framework Status".bold());
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn call_tool(
    boot: &Bootstrap,
    tool: &str,
    raw_args: Option<&str>,
    persona: Option<&str>,
) -> Result<()> {
    let args: Value = match raw_args {
        Some(raw) => serde_json::from_str(raw).context("--args must be a JSON object")?,
        None => Value::Null,
    };

    let runtime = boot.runtime();

    if let Some(id) = persona {
        let activation =
            runtime.execute("set_active_persona", &serde_json::json!({ "persona_id": id }));
        if !activation.success {
            eprintln!("{} {}", "Error:".red().bold(), activation.output_text().red());
            anyhow::bail!("could not activate persona '{}'", id);
        }
    }

    let result = runtime.execute(tool, &args);

    if result.success {
        println!("{}", result.output_text());
        eprintln!(
            "{} {} ({} ms)",
            "✓".green().bold(),
            tool,
            result.duration_ms
        );
        Ok(())
    } else {
        println!("{}", result.output_text());
        eprintln!("{} {}", "✗".red().bold(), tool.red());
        anyhow::bail!(
            "tool '{}' failed: {}",
            tool,
            result.error_kind.as_deref().unwrap_or("unknown")
        )
    }
}

fn show_config(args: &Args, config: &Config) -> Result<()> {
    println!("{}", "Silicon Sampling Configuration".bold());
    println!();

    println!("Paths:");
    println!("  Personas: {}", config.personas_dir().display());
    println!("  Skills:   {}", config.skills_dir().display());
    println!("  Rules:    {}", config.rules_dir().display());
    println!();

    println!("Server:");
    println!("  Name:    {}", config.server.name);
    println!("  Version: {}", config.server.version);
    println!();

    println!("Logging:");
    println!("  Level:     {}", config.logging.level);
    println!("  Verbosity: {}", args.verbosity().as_str());
    println!();

    match Config::default_path() {
        Some(path) if args.config.is_none() => {
            let state = if path.exists() { "found" } else { "not found, using defaults" };
            println!("Config file: {} ({})", path.display(), state);
        }
        _ => {
            if let Some(path) = &args.config {
                println!("Config file: {}", path.display());
            }
        }
    }

    Ok(())
}
