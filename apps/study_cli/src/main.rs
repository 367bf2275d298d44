use std::{path::PathBuf, process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, HttpStudyBackend, SessionController, SessionState};
use shared::domain::{Difficulty, Mode};
use tracing_subscriber::EnvFilter;

mod interactive;
mod render;

#[derive(Parser, Debug)]
#[command(about = "Upload study notes and ask the study assistant about them")]
struct Args {
    /// Base address of the study service.
    #[arg(long, global = true)]
    api_base: Option<String>,
    /// Model identifier forwarded with every chat request.
    #[arg(long, global = true)]
    model: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Upload a PDF to the service.
    Upload { path: PathBuf },
    /// Index every uploaded PDF.
    Ingest,
    /// Check that the service is up.
    Health,
    /// Ask a single question.
    Ask {
        question: String,
        #[arg(long, default_value_t = Mode::Explain)]
        mode: Mode,
        #[arg(long, default_value_t = Difficulty::Medium)]
        difficulty: Difficulty,
        /// Answer to grade; only sent with `--mode grade`.
        #[arg(long)]
        answer: Option<String>,
    },
    /// Interactive session; type `/help` for commands.
    Session,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let args = Args::parse();
    let mut settings = load_settings().context("failed to load client settings")?;
    if let Some(api_base) = args.api_base {
        settings.api_base = client_core::config::normalize_api_base(&api_base)?;
    }
    if let Some(model) = args.model {
        settings.model = model;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(api_base = %settings.api_base, model = %settings.model, "client settings resolved");

    let backend = Arc::new(HttpStudyBackend::new(settings.api_base.clone()));
    let mut controller =
        SessionController::with_state(backend, SessionState::with_model(settings.model));

    let ok = match args.command {
        Command::Upload { path } => {
            let accepted = controller.upload_path(&path).await;
            println!("{}", controller.state().upload_status());
            accepted
        }
        Command::Ingest => {
            let completed = controller.trigger_ingest().await;
            println!("{}", controller.state().upload_status());
            completed
        }
        Command::Health => match controller.check_health().await {
            Ok(status) => {
                println!("Backend: {status}");
                true
            }
            Err(err) => {
                eprintln!("Backend unreachable: {err}");
                false
            }
        },
        Command::Ask {
            question,
            mode,
            difficulty,
            answer,
        } => {
            let state = controller.state_mut();
            state.set_mode(mode);
            state.set_difficulty(difficulty);
            state.set_user_answer(answer.unwrap_or_default());
            state.set_question(question);
            if !controller.send_message().await {
                eprintln!("Nothing to ask: the question is empty.");
                return Ok(ExitCode::FAILURE);
            }
            let messages = controller.state().messages();
            if let Some(reply) = messages.last() {
                println!("{}", render::message(reply));
            }
            print!("{}", render::citations(controller.state().citations()));
            !render::is_fallback_reply(messages)
        }
        Command::Session => {
            interactive::run(&mut controller).await?;
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}
