//! Terminal answers to the pipeline's disambiguation requests.

use std::io::{BufRead, Write};

use meeple_core::DestinationCandidate;
use meeple_import::{Answer, DisambiguationRequest, PendingRequest};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

/// Typed at any prompt to stop the whole run.
const ABORT_INPUT: &str = ":q";

/// Interpret a line typed at the "pick a game" prompt.
///
/// Numbers are 1-based. Returns `None` when the input should be asked again.
pub(crate) fn parse_choice(input: &str, count: usize) -> Option<Answer> {
    let input = input.trim();
    if input.is_empty() {
        return Some(Answer::Declined);
    }
    if input.eq_ignore_ascii_case(ABORT_INPUT) {
        return Some(Answer::Abort);
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(Answer::Choice(n - 1)),
        _ => None,
    }
}

/// Interpret a line typed at the "search again" prompt.
pub(crate) fn parse_query(input: &str) -> Answer {
    let input = input.trim();
    if input.is_empty() {
        Answer::Declined
    } else if input.eq_ignore_ascii_case(ABORT_INPUT) {
        Answer::Abort
    } else {
        Answer::Query(input.to_string())
    }
}

/// Ask on the terminal and send the answer back to the pipeline.
///
/// End of input declines.
pub(crate) fn answer(pending: PendingRequest) {
    let stdin = std::io::stdin();
    let answer = match &pending.request {
        DisambiguationRequest::Research { record_label } => {
            ask_query(&mut stdin.lock(), record_label)
        }
        DisambiguationRequest::Choose {
            record_label,
            candidates,
            researched,
        } => ask_choice(&mut stdin.lock(), record_label, candidates, *researched),
    };
    pending.respond(answer);
}

fn ask_query(input: &mut impl BufRead, record_label: &str) -> Answer {
    println!();
    println!(
        "  {} not found on Ludopedia.",
        record_label.if_supports_color(Stdout, |t| t.bold()),
    );
    print!(
        "  Search for {}: ",
        format!("(Enter to skip, {} to stop)", ABORT_INPUT).if_supports_color(Stdout, |t| t.dimmed()),
    );
    let _ = std::io::stdout().flush();

    match read_line(input) {
        Some(line) => parse_query(&line),
        None => Answer::Declined,
    }
}

fn ask_choice(
    input: &mut impl BufRead,
    record_label: &str,
    candidates: &[DestinationCandidate],
    researched: bool,
) -> Answer {
    println!();
    println!(
        "  Which Ludopedia game is {}?",
        record_label.if_supports_color(Stdout, |t| t.bold()),
    );
    for (i, candidate) in candidates.iter().enumerate() {
        println!(
            "    {} {}",
            format!("{:>2})", i + 1).if_supports_color(Stdout, |t| t.cyan()),
            candidate.label(),
        );
    }

    let hint = choice_hint(researched);
    loop {
        print!(
            "  Number {}: ",
            hint.if_supports_color(Stdout, |t| t.dimmed()),
        );
        let _ = std::io::stdout().flush();

        let Some(line) = read_line(input) else {
            return Answer::Declined;
        };
        if let Some(answer) = parse_choice(&line, candidates.len()) {
            return answer;
        }
        println!(
            "    {}",
            format!("Enter a number between 1 and {}.", candidates.len())
                .if_supports_color(Stdout, |t| t.yellow()),
        );
    }
}

/// What Enter does at the "pick a game" prompt.
fn choice_hint(researched: bool) -> String {
    if researched {
        format!("(Enter to skip this game, {} to stop)", ABORT_INPUT)
    } else {
        format!("(Enter for the first, {} to stop)", ABORT_INPUT)
    }
}

/// `None` on end of input or a read error.
fn read_line(input: &mut impl BufRead) -> Option<String> {
    let mut line = String::new();
    match input.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line),
        Err(e) => {
            log::warn!("Could not read the answer: {}", e);
            None
        }
    }
}

#[cfg(test)]
#[path = "tests/prompt_tests.rs"]
mod tests;
