// SPDX-License-Identifier: Apache-2.0

//! SCRUM report rendering.
//!
//! The template lines are joined and filled with the same safe preparer as
//! GraphQL statements: `${qN}` and `${aN}` for the questions and answers,
//! `${today}` and `${github_report}`. Unknown placeholders stay verbatim.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::settings::ScrumReportTemplate;
use crate::statement::prepare;

/// Placeholder replaced by the day's GitHub activity table.
pub const GITHUB_REPORT: &str = "github_report";

const TODAY: &str = "today";

/// A template being filled in.
#[derive(Debug, Clone)]
pub struct ScrumReport {
    template: ScrumReportTemplate,
    answers: Vec<Vec<String>>,
}

impl ScrumReport {
    /// Starts a report with no answer yet.
    #[must_use]
    pub fn new(template: ScrumReportTemplate) -> Self {
        let answers = vec![Vec::new(); template.questions.len()];
        Self { template, answers }
    }

    /// Questions to ask, in order.
    #[must_use]
    pub fn questions(&self) -> &[String] {
        &self.template.questions
    }

    /// Records the answer lines of question `index`. Out of range indexes are ignored.
    pub fn answer(&mut self, index: usize, lines: Vec<String>) {
        if let Some(slot) = self.answers.get_mut(index) {
            *slot = lines;
        }
    }

    /// Whether the template embeds the GitHub activity table.
    ///
    /// The table costs a request, so callers only fetch it when needed.
    #[must_use]
    pub fn needs_github_report(&self) -> bool {
        self.template.template.iter().any(|line| {
            line.contains(&format!("${{{GITHUB_REPORT}}}"))
                || line.contains(&format!("${GITHUB_REPORT}"))
        })
    }

    /// Fills the template.
    #[must_use]
    pub fn render(&self, day: NaiveDate, github_report: Option<&str>) -> String {
        let mut values = BTreeMap::new();
        for (index, question) in self.template.questions.iter().enumerate() {
            values.insert(format!("q{index}"), question.clone());
            let answer = self.answers[index]
                .iter()
                .map(|line| format!("- {line}"))
                .collect::<Vec<_>>()
                .join("\n");
            values.insert(format!("a{index}"), answer);
        }
        values.insert(TODAY.to_string(), day.format("%Y-%m-%d").to_string());
        if let Some(report) = github_report {
            values.insert(GITHUB_REPORT.to_string(), report.to_string());
        }

        let recognized: Vec<&str> = values.keys().map(String::as_str).collect();
        prepare(&self.template.template.join("\n"), &recognized, &values)
    }
}
