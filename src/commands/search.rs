use std::sync::Arc;
use std::time::Duration;

use owo_colors::OwoColorize;
use serde_json::json;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use super::{CommandOutput, open_store, print_json};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::search::{SearchOutcome, SearchSession, evaluate};

/// Extra wait after the debounce window when stdin closes.
const SETTLE_MARGIN: Duration = Duration::from_millis(50);
const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

fn render_outcome(outcome: &SearchOutcome) -> String {
    if let Some(message) = outcome.message() {
        return message.dimmed().to_string();
    }
    let Some(results) = outcome.results() else {
        return "...".dimmed().to_string();
    };

    let mut lines = Vec::new();
    if !results.projects.is_empty() {
        lines.push("المشاريع".cyan().bold().to_string());
        for project in &results.projects {
            lines.push(format!(
                "  {} {} {}",
                project.id.dimmed(),
                project.display_name(),
                project.display_location().dimmed()
            ));
        }
    }
    if !results.units.is_empty() {
        lines.push("الوحدات".cyan().bold().to_string());
        for hit in &results.units {
            lines.push(format!(
                "  {} {} {}",
                hit.unit.id.dimmed(),
                hit.unit.unit_type,
                hit.project_name.dimmed()
            ));
        }
    }
    lines.join("\n")
}

fn print_outcome(outcome: &SearchOutcome, output: OutputOptions) -> Result<()> {
    if output.json {
        print_json(&json!(outcome))
    } else {
        println!("{}", render_outcome(outcome));
        Ok(())
    }
}

/// Search projects and units.
///
/// With text, runs one search. Without text, reads queries line by line
/// from stdin through the debounced search session and prints each outcome
/// as it settles.
pub async fn cmd_search(text: &str, output: OutputOptions) -> Result<()> {
    let (config, store) = open_store()?;

    if !text.trim().is_empty() {
        let outcome = evaluate(&store, text, config.search.limit).await?;
        return CommandOutput::new(json!(outcome))
            .with_text(render_outcome(&outcome))
            .print(output);
    }

    let window = config.search.debounce();
    let session = SearchSession::new(Arc::new(store), window, config.search.limit);
    let mut outcomes = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    if !output.json {
        println!("{}", render_outcome(&session.outcome()));
    }

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => session.input(&line),
                None => break,
            },
            changed = outcomes.changed() => {
                if changed.is_err() {
                    break;
                }
                let outcome = outcomes.borrow_and_update().clone();
                if outcome != SearchOutcome::Loading {
                    print_outcome(&outcome, output)?;
                }
            }
        }
    }

    settle(&mut outcomes, window, output).await
}

/// After stdin closes, let a pending search finish and print it.
async fn settle(
    outcomes: &mut watch::Receiver<SearchOutcome>,
    window: Duration,
    output: OutputOptions,
) -> Result<()> {
    tokio::time::sleep(window + SETTLE_MARGIN).await;

    let waited = tokio::time::timeout(SETTLE_TIMEOUT, async {
        loop {
            if outcomes.has_changed().unwrap_or(false) {
                let outcome = outcomes.borrow_and_update().clone();
                if outcome != SearchOutcome::Loading {
                    return Some(outcome);
                }
            } else if *outcomes.borrow() != SearchOutcome::Loading {
                return None;
            }
            if outcomes.changed().await.is_err() {
                return None;
            }
        }
    })
    .await;

    match waited {
        Ok(Some(outcome)) => print_outcome(&outcome, output),
        Ok(None) => Ok(()),
        Err(_) => {
            tracing::warn!("search did not finish before stdin closed");
            Ok(())
        }
    }
}
