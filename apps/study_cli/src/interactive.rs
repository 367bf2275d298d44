//! Line-oriented study session. Plain lines are questions; lines starting
//! with `/` adjust the session or trigger uploads and ingest.

use std::path::PathBuf;

use anyhow::Result;
use client_core::SessionController;
use shared::domain::{Difficulty, Mode};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

const HELP: &str = "\
Commands:
  /mode <explain|quiz|flashcards|grade>
  /difficulty <easy|medium|hard>
  /model <name>          e.g. llama3.1:8b or gemma2:2b
  /answer <text>         answer to grade (grade mode only)
  /upload <path>         upload a PDF
  /ingest                index uploaded PDFs
  /citations             show citations from the last answer
  /health                check the service
  /quit
Any other line is sent as a question.";

#[derive(Debug, PartialEq, Eq)]
enum Input {
    Question(String),
    SetMode(Mode),
    SetDifficulty(Difficulty),
    SetModel(String),
    SetAnswer(String),
    Upload(PathBuf),
    Ingest,
    Citations,
    Health,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

fn parse_line(line: &str) -> Input {
    let line = line.trim();
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(command) = line.strip_prefix('/') else {
        return Input::Question(line.to_string());
    };

    let (name, arg) = match command.split_once(char::is_whitespace) {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match (name, arg) {
        ("mode", arg) => arg
            .parse()
            .map(Input::SetMode)
            .unwrap_or_else(|err| Input::Invalid(err.to_string())),
        ("difficulty", arg) => arg
            .parse()
            .map(Input::SetDifficulty)
            .unwrap_or_else(|err| Input::Invalid(err.to_string())),
        ("model", "") => Input::Invalid("usage: /model <name>".to_string()),
        ("model", arg) => Input::SetModel(arg.to_string()),
        ("answer", arg) => Input::SetAnswer(arg.to_string()),
        ("upload", "") => Input::Invalid("usage: /upload <path>".to_string()),
        ("upload", arg) => Input::Upload(PathBuf::from(arg)),
        ("ingest", _) => Input::Ingest,
        ("citations", _) => Input::Citations,
        ("health", _) => Input::Health,
        ("help", _) => Input::Help,
        ("quit" | "exit", _) => Input::Quit,
        (other, _) => Input::Invalid(format!("unknown command '/{other}', try /help")),
    }
}

pub async fn run(controller: &mut SessionController) -> Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    println!("Study session. Mode: {}. Type /help for commands.", controller.state().mode());
    loop {
        let prompt = format!("[{}|{}] > ", controller.state().mode(), controller.state().difficulty());
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse_line(&line) {
            Input::Empty => {}
            Input::Question(question) => {
                controller.state_mut().set_question(question);
                if controller.send_message().await {
                    if let Some(reply) = controller.state().messages().last() {
                        println!("{}", crate::render::message(reply));
                    }
                    let cited = controller.state().citations().len();
                    if cited > 0 {
                        println!("({cited} citations, /citations to show)");
                    }
                }
            }
            Input::SetMode(mode) => {
                controller.state_mut().set_mode(mode);
                if controller.state().shows_answer_box() {
                    println!("Mode: {mode}. Set the answer to grade with /answer <text>.");
                } else {
                    println!("Mode: {mode}");
                }
            }
            Input::SetDifficulty(difficulty) => {
                controller.state_mut().set_difficulty(difficulty);
                println!("Difficulty: {difficulty}");
            }
            Input::SetModel(model) => {
                controller.state_mut().set_model(model);
                println!("Model: {}", controller.state().model());
            }
            Input::SetAnswer(answer) => {
                controller.state_mut().set_user_answer(answer);
                if !controller.state().shows_answer_box() {
                    println!("Answer saved; it is only sent in grade mode.");
                }
            }
            Input::Upload(path) => {
                controller.upload_path(&path).await;
                println!("{}", controller.state().upload_status());
            }
            Input::Ingest => {
                println!("Indexing...");
                controller.trigger_ingest().await;
                println!("{}", controller.state().upload_status());
            }
            Input::Citations => print!("{}", crate::render::citations(controller.state().citations())),
            Input::Health => match controller.check_health().await {
                Ok(status) => println!("Backend: {status}"),
                Err(err) => println!("Backend unreachable: {err}"),
            },
            Input::Help => println!("{HELP}"),
            Input::Quit => break,
            Input::Invalid(reason) => println!("{reason}"),
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_lines_are_questions() {
        assert_eq!(
            parse_line("  Explain the loop of Henle "),
            Input::Question("Explain the loop of Henle".to_string())
        );
        assert_eq!(parse_line("   "), Input::Empty);
    }

    #[test]
    fn slash_commands_parse_arguments() {
        assert_eq!(parse_line("/mode Grade"), Input::SetMode(Mode::Grade));
        assert_eq!(parse_line("/difficulty hard"), Input::SetDifficulty(Difficulty::Hard));
        assert_eq!(parse_line("/model gemma2:2b"), Input::SetModel("gemma2:2b".to_string()));
        assert_eq!(
            parse_line("/answer The answer is X"),
            Input::SetAnswer("The answer is X".to_string())
        );
        assert_eq!(
            parse_line("/upload notes/renal.pdf"),
            Input::Upload(PathBuf::from("notes/renal.pdf"))
        );
        assert_eq!(parse_line("/answer"), Input::SetAnswer(String::new()));
        assert_eq!(parse_line("/exit"), Input::Quit);
    }

    #[test]
    fn bad_commands_explain_themselves() {
        assert_eq!(
            parse_line("/mode essay"),
            Input::Invalid("unknown mode 'essay'".to_string())
        );
        assert_eq!(
            parse_line("/upload"),
            Input::Invalid("usage: /upload <path>".to_string())
        );
        assert!(matches!(parse_line("/teleport"), Input::Invalid(_)));
    }
}
