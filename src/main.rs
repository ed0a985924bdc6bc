use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use trendbot::compose::{char_len, format_count, today_in};
use trendbot::feeds::TrendService;
use trendbot::twitter::XClient;
use trendbot::{compose_detailed, compose_simple, Config, PostComposer, Trend};

#[derive(Parser, Debug)]
#[command(
    name = "trendbot",
    version,
    about = "Post the region's trending investment topics to X"
)]
struct Cli {
    /// Path to config.toml (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Compose but do not publish
    #[arg(long, global = true)]
    dry_run: bool,

    /// Maximum number of trends to include
    #[arg(long, global = true)]
    max_trends: Option<usize>,

    /// Debug logging for this crate
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, compose and publish once (default)
    Run,
    /// Print the current top investment trends
    Trends,
    /// Render sample trends without touching the network
    Preview {
        #[arg(long, value_enum, default_value_t = Style::Random)]
        style: Style,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Style {
    Random,
    Simple,
    Detailed,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    trendbot::logging::init(cli.verbose);

    exit_code(execute(cli).await)
}

/// Errors go through the log like every other failure before the exit.
fn exit_code(result: Result<ExitCode>) -> ExitCode {
    match result {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = ?e, "trend bot aborted");
            ExitCode::FAILURE
        }
    }
}

async fn execute(cli: Cli) -> Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if cli.dry_run {
        config.bot.dry_run = true;
    }
    if let Some(max) = cli.max_trends {
        config.bot.max_trends = max;
    }

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            tracing::info!("starting trend bot");
            let outcome = trendbot::run(&config).await.context("run failed")?;
            if outcome.is_success() {
                tracing::info!("done");
                Ok(ExitCode::SUCCESS)
            } else {
                tracing::error!(?outcome, "run did not publish");
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Trends => {
            config.validate()?;
            let client = XClient::new(config.credentials()?)?.with_api_base(config.bot.api_base.as_str());
            let service = TrendService::new(Arc::new(client), config.keyword_set(), config.bot.region);
            let trends = service.top_investment_trends(config.bot.max_trends).await;
            print_trends(&trends);
            Ok(ExitCode::SUCCESS)
        }
        Command::Preview { style } => {
            let trends = sample_trends();
            let text = match style {
                Style::Random => {
                    let composer = PostComposer::new(config.post_style());
                    let date = today_in(config.timezone()?);
                    composer
                        .compose(&trends, config.bot.max_length, date, &mut rand::rng())
                        .map(|post| post.text)
                }
                Style::Simple => compose_simple(&trends),
                Style::Detailed => Some(compose_detailed(&trends[0])),
            };

            match text {
                Some(text) => {
                    println!("{}\n\n{} characters", text, char_len(&text));
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!("nothing fits in {} characters", config.bot.max_length);
                    Ok(ExitCode::FAILURE)
                }
            }
        }
    }
}

fn print_trends(trends: &[Trend]) {
    println!("{}", "=".repeat(50));
    println!("📈 投資系トレンド（上位{}件）", trends.len());
    println!("{}", "=".repeat(50));

    for (i, trend) in trends.iter().enumerate() {
        println!("\n{}. {}", i + 1, trend.name);
        if let Some(volume) = trend.volume {
            println!("   ツイート数: {}", format_count(volume));
        }
        if let Some(url) = &trend.url {
            println!("   URL: {}", url);
        }
    }
}

fn sample_trends() -> Vec<Trend> {
    vec![
        Trend::new("ビットコイン", Some(12450)),
        Trend::new("日経平均", Some(8230)),
        Trend::new("円安", Some(15680)),
        Trend::new("NISA", Some(5420)),
        Trend::new("金利", None),
    ]
}
