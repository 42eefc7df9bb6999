use anyhow::{Context, Result};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, info};
use mindmirror_core::prompt::ASSISTANT_NAME;
use mindmirror_core::{ChatOutcome, Coordinator, SessionError, View};
use std::io::{self, BufRead, Write};
use std::time::Duration;

use crate::output::{
    print_chat_turn, print_error_box, print_no_report, print_report, print_score_bars,
};

fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Analyzes `text` and shows the scores and report, or the error box.
///
/// Returns whether a report was produced.
pub async fn run_analysis(coordinator: &mut Coordinator, text: &str) -> Result<bool> {
    info!("Running analysis on {} characters", text.chars().count());

    let spinner = spinner("Generating your personalized report…");
    let result = coordinator.analyze(text).await;
    spinner.finish_and_clear();

    match result {
        Ok(()) => {
            let state = coordinator.state();
            print_score_bars(state.scores());
            print_report(state.report());
            Ok(true)
        }
        Err(e) => {
            debug!("Analysis failed: {:?}", e);
            if let Some(message) = coordinator.state().error() {
                print_error_box(message);
            }
            coordinator.clear_error();
            Ok(false)
        }
    }
}

/// Reads the text to analyze from stdin, stopping at an empty line or EOF
pub fn read_text_from_stdin() -> Result<String> {
    println!("Paste a few paragraphs of your writing, then press Enter on an empty line:");
    let stdin = io::stdin();
    let mut lines = Vec::new();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read input")?;
        if line.trim().is_empty() && !lines.is_empty() {
            break;
        }
        lines.push(line);
    }
    Ok(lines.join("\n"))
}

/// Runs an interactive chat session with Arjus about the current report
pub async fn run_interactive_chat(coordinator: &mut Coordinator) -> Result<()> {
    coordinator.navigate(View::Chat);
    if !coordinator.state().has_report() {
        print_no_report();
        return Ok(());
    }

    println!(
        "Chat with {} about your report. Type '/report' or '/scores' to review it, 'exit' or 'quit' to leave.",
        ASSISTANT_NAME
    );
    println!();

    loop {
        print!("{}: ", "You".green().bold());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .read_line(&mut input)
            .context("Failed to read input")?;
        if read == 0 {
            break;
        }

        let input = input.trim();
        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("Exiting chat session.");
            break;
        }
        if input == "/report" {
            print_report(coordinator.state().report());
            continue;
        }
        if input == "/scores" {
            print_score_bars(coordinator.state().scores());
            continue;
        }

        let spinner = spinner(&format!("{} is thinking…", ASSISTANT_NAME));
        debug!("Sending chat message: {}", input);
        let result = coordinator.chat(input).await;
        spinner.finish_and_clear();

        match result {
            Ok(outcome) => {
                if outcome == ChatOutcome::Fallback {
                    debug!("Chat reply fell back after retries");
                }
                if let Some(turn) = coordinator.state().transcript().last() {
                    print_chat_turn(turn);
                }
            }
            Err(SessionError::NoReport) => {
                print_no_report();
                break;
            }
            Err(e) => {
                eprintln!("Error: {}", e);
            }
        }

        println!();
    }

    Ok(())
}
