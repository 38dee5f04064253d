use std::{
    io::IsTerminal,
    path::{Path, PathBuf},
    process::ExitCode,
};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    config::load_settings_from,
    load_settings,
    presenter::present,
    ClientSettings, ControllerEvent, SubmissionController, SubmitOutcome,
};
use shared::domain::SurveyState;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod answers;
mod editor;
mod form;
mod render;

use render::Style;

#[derive(Parser, Debug)]
#[command(name = "ergocare", about = "Workplace health risk self-assessment client")]
struct Cli {
    /// Settings file; defaults to ./client.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Root address of the prediction service; overrides file and environment.
    #[arg(long, global = true)]
    api_base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every survey field with its allowed values and default.
    Fields,
    /// Fill in the survey and submit it for a risk report.
    Submit(SubmitArgs),
}

#[derive(Args, Debug)]
struct SubmitArgs {
    /// JSON or TOML object of answers; missing fields keep their defaults.
    #[arg(long)]
    answers: Option<PathBuf>,
    /// Edit one field, e.g. `--set neck_pain=3`. May be repeated.
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    set: Vec<String>,
    /// Also print the complete response as JSON.
    #[arg(long)]
    json: bool,
    #[arg(long)]
    no_color: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    match cli.command {
        Command::Fields => {
            print!("{}", form::field_listing());
            Ok(ExitCode::SUCCESS)
        }
        Command::Submit(ref args) => {
            let settings = resolve_settings(cli.config.as_deref(), cli.api_base_url.clone())?;
            submit(&settings, args).await
        }
    }
}

fn resolve_settings(config: Option<&Path>, api_base_url: Option<String>) -> Result<ClientSettings> {
    let settings = match config {
        Some(path) => load_settings_from(path, |key| std::env::var(key).ok()),
        None => load_settings(),
    }
    .context("failed to resolve client settings")?;
    let settings = match api_base_url {
        Some(url) => settings
            .with_api_base_url(url)
            .context("invalid --api-base-url")?,
        None => settings,
    };
    info!(api_base_url = %settings.api_base_url, "client settings resolved");
    Ok(settings)
}

async fn submit(settings: &ClientSettings, args: &SubmitArgs) -> Result<ExitCode> {
    let live = match &args.answers {
        Some(path) => answers::load(path)?,
        None => SurveyState::default(),
    };
    let live = editor::apply_assignments(live, &args.set)?;
    let style = Style {
        color: !args.no_color && std::io::stdout().is_terminal(),
    };

    println!("{}", form::summary(&live));

    let controller = SubmissionController::from_settings(settings)?;
    let mut events = controller.subscribe_events();

    println!("Analyzing your data...\n");
    match controller.submit(live).await? {
        SubmitOutcome::Failure(err) => {
            eprint!("{}", render::error_panel(&err, style));
            Ok(ExitCode::FAILURE)
        }
        SubmitOutcome::Success(_) => {
            wait_for_reveal(&mut events).await;
            let state = controller.result_state().await;
            let report = state
                .response()
                .context("result state lost the successful response")?;
            let view = present(report).context("failed to render report")?;
            print!("{}", render::report(&view, style, args.json));
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// The results region "mounts" once the controller asks for it to be revealed.
async fn wait_for_reveal(events: &mut Receiver<ControllerEvent>) {
    loop {
        match events.recv().await {
            Ok(ControllerEvent::RevealResults) | Err(RecvError::Closed) => return,
            Ok(event) => debug!(?event, "controller event"),
            Err(RecvError::Lagged(skipped)) => debug!(skipped, "controller events lagged"),
        }
    }
}
