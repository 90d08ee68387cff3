use anyhow::{Context, Result};
use clap::Parser;
use std::io::Read;
use std::path::Path;

use chatview_config::Config;

mod cli_args;
mod render_once;
mod stream_mode;

pub use cli_args::{Cli, Commands};

pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli);

    let config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Render {
            file,
            raw,
            no_buttons,
        } => {
            let text = read_input(file.as_deref())?;
            let include_buttons = config.render.code_buttons && !no_buttons;
            render_once::run(&text, raw, include_buttons)
        }
        Commands::Stream {
            file,
            chunk_size,
            final_only,
            script,
        } => {
            let text = read_input(file.as_deref())?;
            stream_mode::run(text, chunk_size, final_only, script, &config).await
        }
    }
}

fn initialize_logging(cli: &Cli) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if cli.verbose {
        EnvFilter::from_default_env()
            .add_directive("chatview=debug".parse().unwrap())
            .add_directive("chatview_cli=debug".parse().unwrap())
            .add_directive("chatview_render=debug".parse().unwrap())
            .add_directive("chatview_host=debug".parse().unwrap())
            .add_directive("chatview_stream=debug".parse().unwrap())
            .add_directive("chatview_config=debug".parse().unwrap())
    } else {
        EnvFilter::from_default_env()
            .add_directive("chatview=info".parse().unwrap())
            .add_directive("chatview_cli=info".parse().unwrap())
            .add_directive("chatview_render=info".parse().unwrap())
            .add_directive("chatview_host=info".parse().unwrap())
            .add_directive("chatview_stream=info".parse().unwrap())
            .add_directive("chatview_config=info".parse().unwrap())
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            Ok(buffer)
        }
    }
}
