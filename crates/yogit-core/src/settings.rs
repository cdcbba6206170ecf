// SPDX-License-Identifier: Apache-2.0

//! Local settings: the configured GitHub account and the SCRUM report template.
//!
//! Both live as TOML files in the configuration directory. Account settings
//! are read-only while queries run; only `account setup` writes them.

use std::fs;
use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::{scrum_report_file_path, settings_file_path};
use crate::error::YogitError;

/// Current layout version of `settings.toml`.
pub const SETTINGS_VERSION: u32 = 1;

/// Current layout version of `scrum_report.toml`.
pub const SCRUM_REPORT_VERSION: u32 = 1;

/// Read access to the configured account.
///
/// The query engine resolves `$login` and authenticates through this trait,
/// so tests can provide an in-memory account.
pub trait SettingsProvider: Send + Sync {
    /// Retrieves the GitHub token.
    ///
    /// Returns `None` when no token is configured.
    fn github_token(&self) -> Option<SecretString>;

    /// Retrieves the GitHub login.
    fn login(&self) -> Option<String>;

    /// Retrieves the email addresses attached to the account.
    fn emails(&self) -> Vec<String>;
}

/// Snapshot of the account settings file.
#[derive(Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AccountSettings {
    /// File layout version.
    pub version: u32,
    /// GitHub personal access token.
    pub token: String,
    /// GitHub login.
    pub login: String,
    /// Email addresses known by GitHub for this account.
    pub emails: Vec<String>,
}

impl std::fmt::Debug for AccountSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountSettings")
            .field("version", &self.version)
            .field("token", &"[REDACTED]")
            .field("login", &self.login)
            .field("emails", &self.emails)
            .finish()
    }
}

impl AccountSettings {
    /// Returns true once `account setup` completed: token, login and emails are all set.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.token.is_empty() && !self.login.is_empty() && !self.emails.is_empty()
    }
}

impl SettingsProvider for AccountSettings {
    fn github_token(&self) -> Option<SecretString> {
        (!self.token.is_empty()).then(|| SecretString::from(self.token.clone()))
    }

    fn login(&self) -> Option<String> {
        (!self.login.is_empty()).then(|| self.login.clone())
    }

    fn emails(&self) -> Vec<String> {
        self.emails.clone()
    }
}

/// File-backed account settings.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(settings_file_path())
    }
}

impl SettingsStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the settings file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the settings.
    ///
    /// A missing, unreadable or outdated file yields empty settings.
    #[must_use]
    pub fn load(&self) -> AccountSettings {
        let Some(contents) = read_optional(&self.path) else {
            return AccountSettings::default();
        };
        match toml::from_str::<AccountSettings>(&contents) {
            Ok(settings) if settings.version == SETTINGS_VERSION => settings,
            Ok(settings) => {
                warn!(
                    version = settings.version,
                    "Ignoring settings written by an incompatible version"
                );
                AccountSettings::default()
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to parse settings");
                AccountSettings::default()
            }
        }
    }

    /// Writes the settings, stamping the current layout version.
    pub fn save(&self, settings: &AccountSettings) -> Result<(), YogitError> {
        let mut settings = settings.clone();
        settings.version = SETTINGS_VERSION;
        write_file(&self.path, &toml::to_string(&settings)?)?;
        debug!(path = %self.path.display(), "Saved settings");
        Ok(())
    }

    /// Erases every setting.
    pub fn reset(&self) -> Result<(), YogitError> {
        self.save(&AccountSettings::default())
    }

    /// Stores the GitHub token.
    pub fn set_token(&self, token: &str) -> Result<(), YogitError> {
        let mut settings = self.load();
        settings.token = token.to_string();
        self.save(&settings)
    }

    /// Stores the GitHub login.
    pub fn set_login(&self, login: &str) -> Result<(), YogitError> {
        let mut settings = self.load();
        settings.login = login.to_string();
        self.save(&settings)
    }

    /// Stores the account email addresses.
    pub fn set_emails(&self, emails: Vec<String>) -> Result<(), YogitError> {
        let mut settings = self.load();
        settings.emails = emails;
        self.save(&settings)
    }
}

const DEFAULT_SCRUM_REPORT: &str = r#"# Available placeholders:
# questions: list of question to ask
# template: report template, each element is a line, available placeholders are:
#   ${today}: yyyy-MM-dd
#   ${qx}: x-th question
#   ${ax}: x-th answer
#   ${github_report}: GitHub activity presented in a table
version = 1

questions = [
    "What have you done today?",
    "Do you have any blockers?",
    "What do you plan to work on your next working day?",
]

template = [
    "*REPORT ${today}*",
    "*${q0}*",
    "${a0}",
    "*${q1}*",
    "${a1}",
    "*${q2}*",
    "${a2}",
    "",
    "```",
    "${github_report}",
    "```",
]
"#;

/// Questions asked and template filled by `scrum report`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrumReportTemplate {
    /// Questions, in asking order. Question `i` fills `${qi}` and `${ai}`.
    pub questions: Vec<String>,
    /// Report lines.
    pub template: Vec<String>,
}

#[derive(Deserialize)]
struct ScrumReportFile {
    questions: Vec<String>,
    template: Vec<String>,
}

/// File-backed SCRUM report template.
#[derive(Debug, Clone)]
pub struct ScrumReportStore {
    path: PathBuf,
}

impl Default for ScrumReportStore {
    fn default() -> Self {
        Self::new(scrum_report_file_path())
    }
}

impl ScrumReportStore {
    /// Creates a store backed by `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the template file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the template, writing the default one first when none exists.
    pub fn load(&self) -> Result<ScrumReportTemplate, YogitError> {
        let contents = match read_optional(&self.path) {
            Some(contents) if !contents.trim().is_empty() => contents,
            _ => {
                write_file(&self.path, DEFAULT_SCRUM_REPORT)?;
                debug!(path = %self.path.display(), "Wrote default SCRUM report template");
                DEFAULT_SCRUM_REPORT.to_string()
            }
        };

        let file: ScrumReportFile = toml::from_str(&contents).map_err(|e| {
            warn!(error = %e, "Invalid SCRUM report template");
            YogitError::invalid("Unable to parse SCRUM report template")
        })?;

        Ok(ScrumReportTemplate {
            questions: file.questions,
            template: file.template,
        })
    }
}

fn read_optional(path: &Path) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(contents) => Some(contents),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read file");
            None
        }
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), YogitError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| YogitError::Settings {
            message: format!("Failed to create directory {}: {e}", parent.display()),
        })?;
    }
    fs::write(path, contents).map_err(|e| YogitError::Settings {
        message: format!("Failed to write {}: {e}", path.display()),
    })
}
