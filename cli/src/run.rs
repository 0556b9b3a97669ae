use anyhow::{Context, Result};
use emtsim_core::error::ProtocolError;
use emtsim_core::message::{Message, MessageKind, PendingInput};
use emtsim_runtime::{EngineConfig, Orchestrator, RunReport, Session, SessionState};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::broadcast;

pub async fn run_command(
    config_path: Option<&Path>,
    no_pacing: bool,
    report_path: Option<&Path>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => EngineConfig::from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::default(),
    };
    config = config.with_env().context("Invalid EMTSIM_* environment override")?;
    if no_pacing {
        config.pacing = false;
    }

    let session = Session::new(config.clone()).context("Invalid engine configuration")?;
    tracing::info!(session = %session.id(), "Session started");
    let orchestrator = Orchestrator::new(emtsim_std::standard_catalog()).with_halt_policy(config.halt);
    let mut feed = session.subscribe();

    let runner = {
        let session = session.clone();
        tokio::spawn(async move { orchestrator.run(&session).await })
    };

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            biased;
            message = feed.recv() => match message {
                Ok(message) => print_message(&message),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Narration feed lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            state = session.next_request() => {
                drain(&mut feed);
                match state {
                    Some(SessionState::AwaitingInput(request)) => {
                        prompt_for_answer(&session, &request, &mut stdin).await?;
                    }
                    Some(SessionState::AwaitingContinue) => {
                        print_flush("\n[Enter to continue] ")?;
                        match stdin.next_line().await? {
                            Some(_) => {
                                if let Err(err) = session.proceed() {
                                    tracing::warn!(error = %err, "Continue not accepted");
                                }
                            }
                            None => session.abandon(),
                        }
                    }
                    _ => break,
                }
            }
        }
    }

    let result = runner.await.context("Orchestrator task failed")?;
    drain(&mut feed);

    match result {
        Ok(report) => {
            println!("\nRun {}: {}", report.run_id, report.outcome);
            if let Some(path) = report_path {
                write_report(&report, path)?;
            }
            Ok(())
        }
        Err(ProtocolError::Abandoned(_)) => {
            println!("\nRun abandoned.");
            Ok(())
        }
        Err(err) => Err(err).context("Run failed"),
    }
}

async fn prompt_for_answer(
    session: &Session,
    request: &PendingInput,
    stdin: &mut Lines<BufReader<Stdin>>,
) -> Result<()> {
    println!("\n? {}", request.prompt);
    for (i, option) in request.options.iter().enumerate() {
        println!("  {}) {}", i + 1, option);
    }
    print_flush("> ")?;

    let Some(line) = stdin.next_line().await? else {
        session.abandon();
        return Ok(());
    };
    let token = resolve_token(request, line.trim());
    if let Err(err) = session.answer(token) {
        // Strict policy keeps the request pending; the loop asks again.
        println!("  {err}");
    }
    Ok(())
}

/// Accept an option number, or a token matched case-insensitively.
/// Anything else is passed through as typed.
fn resolve_token(request: &PendingInput, input: &str) -> String {
    if let Ok(n) = input.parse::<usize>() {
        if let Some(option) = n.checked_sub(1).and_then(|i| request.options.get(i)) {
            return option.clone();
        }
    }
    request
        .options
        .iter()
        .find(|option| option.eq_ignore_ascii_case(input))
        .cloned()
        .unwrap_or_else(|| input.to_string())
}

fn drain(feed: &mut broadcast::Receiver<Message>) {
    loop {
        match feed.try_recv() {
            Ok(message) => print_message(&message),
            Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
}

fn print_message(message: &Message) {
    match message.kind {
        MessageKind::Header => {
            println!("\n{}", message.text);
            println!("{}", "=".repeat(message.text.chars().count()));
        }
        // The operator already sees what they typed.
        MessageKind::Input => {}
        _ => println!("{}", message.text),
    }
}

fn print_flush(text: &str) -> Result<()> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{text}")?;
    stdout.flush()?;
    Ok(())
}

fn write_report(report: &RunReport, path: &Path) -> Result<()> {
    let json = report.to_json()?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    tracing::info!(path = %path.display(), "Run report written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> PendingInput {
        PendingInput::new("Skin status is", &["WARM/DRY", "PALE/COOL/DIAPHORETIC"])
    }

    #[test]
    fn numbers_select_options() {
        assert_eq!(resolve_token(&request(), "2"), "PALE/COOL/DIAPHORETIC");
        assert_eq!(resolve_token(&request(), "0"), "0");
        assert_eq!(resolve_token(&request(), "3"), "3");
    }

    #[test]
    fn tokens_match_case_insensitively() {
        assert_eq!(resolve_token(&request(), "warm/dry"), "WARM/DRY");
        assert_eq!(resolve_token(&request(), "clammy"), "clammy");
    }
}
