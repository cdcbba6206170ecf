// SPDX-License-Identifier: Apache-2.0

//! `account setup` and `account usage`.

use std::io::{BufRead, IsTerminal};
use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use dialoguer::Password;
use tracing::{debug, warn};
use yogit_core::query::account::{EmailQuery, LoginQuery, RateLimitQuery};
use yogit_core::{AccountSettings, AppConfig, Query, QueryEngine, SettingsStore, YogitError};

use super::{build_engine, with_spinner};
use crate::cli::OutputContext;
use crate::output;

const BANNER: &str = r" _   _  ___   __ _(_) |_
| | | |/ _ \ / _` | | __|
| |_| | (_) | (_| | | |_
 \__, |\___/ \__, |_|\__|
 |___/       |___/";

/// Text shown before asking for the token.
fn welcome_text(settings_path: &Path) -> String {
    format!(
        "{BANNER}\n\n\
         Welcome to yogit!\n\n\
         Go here to generate a GitHub personal access token:\n\
         https://github.com/settings/tokens\n\
         Required scopes are:\n\
         • read:org\n\
         • read:user\n\
         • user:email\n\
         • repo\n\n\
         Configuration is stored here `{}`,\n\
         and is not encrypted, only use yogit on your personal computer.\n",
        settings_path.display()
    )
}

/// Reads the token: hidden prompt on a terminal, first stdin line otherwise.
fn read_token() -> Result<String> {
    if std::io::stdin().is_terminal() {
        let token = Password::new()
            .with_prompt("GitHub token")
            .interact()
            .context("Failed to read token")?;
        return Ok(token.trim().to_string());
    }
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read token")?;
    Ok(line.trim().to_string())
}

/// Fetches login and emails with `token`.
async fn identify(
    config: &AppConfig,
    token: String,
    ctx: &OutputContext,
) -> Result<(String, Vec<String>)> {
    let engine = build_engine(
        config,
        AccountSettings {
            token,
            ..AccountSettings::default()
        },
    )?;

    let (login, emails) = with_spinner(ctx, "Checking token...", async {
        let login = Query::new(LoginQuery).execute(&engine).await?;
        let emails = Query::new(EmailQuery).execute(&engine).await?;
        Ok::<_, YogitError>((login.into_data(), emails.into_data()))
    })
    .await?;

    let login = login
        .into_iter()
        .next()
        .ok_or_else(|| YogitError::shape("missing viewer login"))?;
    Ok((login, emails))
}

/// Asks for a token, checks it and stores the account.
///
/// Settings are erased first, and erased again if anything fails, so a
/// half-configured account never survives.
pub async fn run_setup(
    config: &AppConfig,
    store: &SettingsStore,
    ctx: &OutputContext,
) -> Result<()> {
    store.reset()?;
    println!("{}", welcome_text(store.path()));

    let token = read_token()?;
    store.set_token(&token)?;

    let (login, emails) = match identify(config, token, ctx).await {
        Ok(identity) => identity,
        Err(e) => {
            warn!(error = %e, "Account setup failed");
            store.reset()?;
            return Err(e);
        }
    };
    debug!(%login, emails = emails.len(), "Account identified");

    store.set_login(&login)?;
    store.set_emails(emails)?;

    println!("{}", style(format!("Hello {login}! 💕✨")).bold());
    Ok(())
}

/// Prints the remaining API quota.
pub async fn run_usage(engine: &QueryEngine, ctx: &OutputContext) -> Result<()> {
    let query = with_spinner(
        ctx,
        "Fetching quota...",
        Query::new(RateLimitQuery).execute(engine),
    )
    .await?;
    output::render_query(&query, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_text_lists_scopes_and_path() {
        let text = welcome_text(Path::new("/home/user1/.config/yogit/settings.toml"));
        for scope in ["read:org", "read:user", "user:email", "repo"] {
            assert!(text.contains(&format!("• {scope}\n")), "{scope}");
        }
        assert!(text.contains("`/home/user1/.config/yogit/settings.toml`"));
    }
}
