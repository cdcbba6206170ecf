// SPDX-License-Identifier: Apache-2.0

//! Command handlers for the yogit CLI.
//!
//! Every command except `account setup` and `completion` runs behind the
//! same wrappers: the account precondition, then the optional update
//! notice, then a spinner while GitHub is queried.

pub mod account;
pub mod branch;
pub mod completion;
pub mod contrib;
pub mod orga;
pub mod pr;
pub mod review;
pub mod scrum;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;
use yogit_core::update::CURRENT_VERSION;
use yogit_core::{
    AccountSettings, AppConfig, GitHubClient, QueryEngine, SettingsProvider, SettingsStore,
    SystemClock, UpdateChecker, YogitError,
};

use crate::cli::{
    AccountCommand, BranchCommand, Commands, ContribCommand, MemberCommand, OrgaCommand,
    OrgaPrCommand, OutputContext, PrCommand, ReviewCommand, ScrumCommand,
};

/// Creates a styled spinner (only if interactive).
fn maybe_spinner(ctx: &OutputContext, message: &str) -> Option<ProgressBar> {
    if !ctx.is_interactive() {
        return None;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(100));
    Some(spinner)
}

/// Awaits `future` behind a spinner, cleared whatever the outcome.
pub async fn with_spinner<F: Future>(ctx: &OutputContext, message: &str, future: F) -> F::Output {
    let spinner = maybe_spinner(ctx, message);
    let output = future.await;
    if let Some(s) = spinner {
        s.finish_and_clear();
    }
    output
}

/// Loads the account settings, failing when `account setup` never completed.
pub fn require_account(store: &SettingsStore) -> Result<AccountSettings, YogitError> {
    let settings = store.load();
    if settings.is_valid() {
        debug!(login = %settings.login, "Account loaded");
        Ok(settings)
    } else {
        Err(YogitError::AccountRequired)
    }
}

/// Builds the query engine for an account.
///
/// An account without a token fails before any request is made.
pub fn build_engine(config: &AppConfig, settings: AccountSettings) -> Result<QueryEngine> {
    let token = settings.github_token().ok_or(YogitError::AccountRequired)?;
    let client = GitHubClient::from_config(&config.github, &token)?;
    let engine = QueryEngine::new(Arc::new(client), Arc::new(settings), Arc::new(SystemClock));
    Ok(engine.with_max_pages(config.query.max_pages))
}

/// Prints a notice on stderr when a newer release exists.
pub async fn notify_update(config: &AppConfig, engine: &QueryEngine, ctx: &OutputContext) {
    if !config.update.enabled || ctx.quiet {
        return;
    }
    let checker = UpdateChecker::new(config.update.repository.clone(), CURRENT_VERSION);
    if let Some(notice) = checker.check(engine).await {
        eprintln!("{}", style(notice).yellow());
    }
}

/// Dispatch to the appropriate command handler.
pub async fn run(command: Commands, ctx: OutputContext, config: &AppConfig) -> Result<()> {
    let command = match command {
        Commands::Completion { shell } => return completion::run(shell),
        Commands::Account(AccountCommand::Setup) => {
            return account::run_setup(config, &SettingsStore::default(), &ctx).await;
        }
        command => command,
    };

    let settings = require_account(&SettingsStore::default())?;
    let engine = build_engine(config, settings)?;
    notify_update(config, &engine, &ctx).await;

    match command {
        Commands::Account(AccountCommand::Usage) => account::run_usage(&engine, &ctx).await,

        Commands::Branch(BranchCommand::List { dangling }) => {
            branch::run_list(&engine, dangling, &ctx).await
        }

        Commands::Contrib(contrib_cmd) => match contrib_cmd {
            ContribCommand::List { from, to } => {
                contrib::run_list(&engine, from.as_deref(), to.as_deref(), &ctx).await
            }
            ContribCommand::Stats => contrib::run_stats(&engine, &ctx).await,
        },

        Commands::Orga(orga_cmd) => match orga_cmd {
            OrgaCommand::List => orga::run_list(&engine, &ctx).await,
            OrgaCommand::Member(MemberCommand::List { orga }) => {
                orga::run_member_list(&engine, orga.as_deref(), &ctx).await
            }
            OrgaCommand::Member(MemberCommand::Pickone { orga }) => {
                orga::run_pickone(&engine, orga.as_deref(), &ctx).await
            }
            OrgaCommand::Pr(OrgaPrCommand::List { orga, labels }) => {
                orga::run_pr_list(&engine, orga.as_deref(), labels, &ctx).await
            }
        },

        Commands::Pr(PrCommand::List) => pr::run_list(&engine, &ctx).await,

        Commands::Review(review_cmd) => match review_cmd {
            ReviewCommand::List => review::run_list(&engine, &ctx).await,
            ReviewCommand::Requested { missed } => {
                review::run_requested(&engine, missed, &ctx).await
            }
        },

        Commands::Scrum(ScrumCommand::Report { date }) => {
            scrum::run_report(&engine, date.as_deref(), &ctx).await
        }

        Commands::Completion { .. } | Commands::Account(AccountCommand::Setup) => Ok(()),
    }
}
