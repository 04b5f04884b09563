// ABOUTME: CLI entrypoint for mata command
// ABOUTME: Handles logging setup, error exit codes and command dispatch

use clap::Parser;
use mata::{
    api::ApiClient,
    cli::{Cli, Commands, PostsCommand},
    commands,
    config::{default_config_path, init_config, resolve_config, Overrides},
    editor::{edit_post, editor_from_env},
    sync::sync_dir,
    Result,
};
use std::io::{self, Write};
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("mata: [E{}] {}", e.exit_code(), e);
        std::process::exit(e.exit_code());
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "mata=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<()> {
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match cli.command {
        Commands::Init => {
            init_config(&config_path)?;
            writeln!(
                out,
                "mata initialized successfully: '{}' file created",
                config_path.display()
            )?;
        }
        Commands::Posts {
            command: PostsCommand::New { title, dir },
        } => {
            commands::new_post(&title, &dir, &mut out)?;
        }
        Commands::Posts { command } => {
            let config = resolve_config(
                Overrides {
                    endpoint: cli.endpoint,
                    key: cli.key,
                },
                &config_path,
            )?;
            let client = ApiClient::new(config.endpoint, config.key)?
                .with_timeout(Duration::from_secs(cli.timeout))?;

            run_posts(&client, command, &mut out)?;
        }
    }

    Ok(())
}

fn run_posts(client: &ApiClient, command: PostsCommand, out: &mut impl Write) -> Result<()> {
    match command {
        PostsCommand::List { json } => commands::list_posts(client, json, out)?,
        PostsCommand::Get { slug, json, output } => {
            commands::get_post(client, &slug, json, output.as_deref(), out)?
        }
        PostsCommand::Create { file, open } => {
            let receipt = commands::create_post(client, &file, out)?;
            if open && !receipt.url.is_empty() {
                if let Err(e) = open::that(&receipt.url) {
                    warn!(url = %receipt.url, "could not open browser: {}", e);
                }
            }
        }
        PostsCommand::Update { slug, file } => {
            commands::update_post(client, &slug, &file, out)?;
        }
        PostsCommand::Delete { slug } => commands::delete_post(client, &slug, out)?,
        PostsCommand::Edit { slug } => {
            let editor = editor_from_env()?;
            if edit_post(client, &slug, &editor)? {
                writeln!(out, "post '{}' updated successfully", slug)?;
            } else {
                writeln!(out, "post '{}' unchanged", slug)?;
            }
        }
        PostsCommand::New { title, dir } => {
            commands::new_post(&title, &dir, out)?;
        }
        PostsCommand::Sync { directory } => {
            let report = sync_dir(client, &directory)?;
            if !report.failures.is_empty() {
                writeln!(out, "{} file(s) failed to sync:", report.failures.len())?;
                for failure in &report.failures {
                    writeln!(out, "  {}", failure.path.display())?;
                }
            }
        }
    }
    Ok(())
}
