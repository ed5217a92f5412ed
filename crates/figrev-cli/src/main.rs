mod cmd;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "figrev",
    about = "AI product reviews for Figma designs — extract, prompt, review",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "3000", env = "PORT")]
        port: u16,

        /// Directory for per-job artifacts (extracted markdown, reviews, telemetry)
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
    },

    /// Export a Figma file's text nodes to annotated markdown
    Export {
        /// Figma share link or bare file key
        link: String,

        /// Figma personal access token
        #[arg(long, env = "FIGMA_PAT")]
        token: String,

        /// Output path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Run the full review pipeline once and print the result
    Review {
        /// Figma share link or bare file key
        link: String,

        /// Figma personal access token
        #[arg(long, env = "FIGMA_PAT")]
        token: String,

        /// Gemini API key, passed to the CLI subprocess
        #[arg(long, env = "GEMINI_API_KEY")]
        gemini_key: String,

        /// Review prompt (the rubric is appended unless {{RUBRIC_SECTIONS}} is embedded)
        #[arg(long, default_value = "Review this product design.")]
        prompt: String,

        /// Gemini model name
        #[arg(long, env = "GEMINI_MODEL")]
        model: Option<String>,

        /// Truncate extracted markdown to this many characters
        #[arg(long, env = "INPUT_CHAR_LIMIT")]
        input_char_limit: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Serve { port, data_dir } => figrev_server::serve(data_dir, port).await,
        Commands::Export { link, token, out } => cmd::export::run(&link, &token, out.as_deref()).await,
        Commands::Review {
            link,
            token,
            gemini_key,
            prompt,
            model,
            input_char_limit,
        } => {
            cmd::review::run(cmd::review::ReviewArgs {
                link,
                token,
                gemini_key,
                prompt,
                model,
                input_char_limit,
            })
            .await
        }
    }
}
