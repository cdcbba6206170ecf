// SPDX-License-Identifier: Apache-2.0

//! `scrum report`: asks the template questions and fills the report.

use std::io::{BufRead, IsTerminal, Write};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use console::style;
use serde::Serialize;
use tracing::debug;
use yogit_core::query::contributions::DailyContributionQuery;
use yogit_core::utils::parse_day;
use yogit_core::{Query, QueryEngine, ScrumReport, ScrumReportStore};

use super::with_spinner;
use crate::cli::OutputContext;
use crate::output;

#[derive(Serialize)]
struct ScrumOutput<'a> {
    date: NaiveDate,
    report: &'a str,
}

/// Interactive text goes to stdout, or stderr when stdout carries JSON/YAML.
fn say(message: impl std::fmt::Display, ctx: &OutputContext) {
    if ctx.is_text() {
        println!("{message}");
    } else {
        eprintln!("{message}");
    }
}

/// Reads answer lines until an empty line or end of input.
fn read_answers(input: &mut impl BufRead, prompt: bool) -> Result<Vec<String>> {
    let mut answers = Vec::new();
    loop {
        if prompt {
            print!("- ");
            std::io::stdout().flush().context("Failed to write prompt")?;
        }
        let mut line = String::new();
        if input.read_line(&mut line).context("Failed to read answer")? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            break;
        }
        answers.push(line.to_string());
    }
    Ok(answers)
}

/// Generates the report of `date` (default: today).
pub async fn run_report(
    engine: &QueryEngine,
    date: Option<&str>,
    ctx: &OutputContext,
) -> Result<()> {
    let day = match date {
        Some(date) => parse_day(date)?,
        None => engine.clock().now().date_naive(),
    };

    let store = ScrumReportStore::default();
    let template = store.load()?;
    say(format!("Loaded from `{}`", store.path().display()), ctx);

    let mut report = ScrumReport::new(template);
    let prompt = std::io::stdin().is_terminal() && ctx.is_text();
    let mut input = std::io::stdin().lock();
    let questions = report.questions().to_vec();
    for (index, question) in questions.iter().enumerate() {
        say(
            format!("{} (empty line to move on)", style(question).bold()),
            ctx,
        );
        let answers = read_answers(&mut input, prompt)?;
        debug!(index, answers = answers.len(), "Question answered");
        report.answer(index, answers);
    }
    drop(input);

    let github_report = if report.needs_github_report() {
        let query = with_spinner(
            ctx,
            "Fetching activity...",
            Query::new(DailyContributionQuery::new(day)).execute(engine),
        )
        .await?;
        Some(query.tabulate())
    } else {
        None
    };

    let rendered = report.render(day, github_report.as_deref());
    output::render(
        &ScrumOutput {
            date: day,
            report: &rendered,
        },
        || rendered.clone(),
        ctx,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_answers_stop_at_empty_line() {
        let mut input = Cursor::new("thing1\nthing2\n\nthing3\n");
        assert_eq!(read_answers(&mut input, false).unwrap(), ["thing1", "thing2"]);
        assert_eq!(read_answers(&mut input, false).unwrap(), ["thing3"]);
    }

    #[test]
    fn test_answers_stop_at_eof() {
        let mut input = Cursor::new("last line without newline");
        assert_eq!(
            read_answers(&mut input, false).unwrap(),
            ["last line without newline"]
        );
        assert!(read_answers(&mut input, false).unwrap().is_empty());
    }

    #[test]
    fn test_windows_line_endings() {
        let mut input = Cursor::new("thing1\r\n\r\n");
        assert_eq!(read_answers(&mut input, false).unwrap(), ["thing1"]);
    }
}
