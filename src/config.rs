// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::context::AppContext;
use crate::gate::NotificationPolicy;
use crate::storage::LocalStorage;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::str::FromStr;
use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

fn default_true() -> bool {
    true
}

fn default_date_languages() -> String {
    "de".to_string()
}

/// Languages in which the booking site offers exam slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DateLanguage {
    De,
    Fr,
}

impl DateLanguage {
    /// CSS class of the flag icon the site puts on offers in this language.
    pub fn flag_class(self) -> &'static str {
        match self {
            DateLanguage::De => "flag-icon-de",
            DateLanguage::Fr => "flag-icon-fr",
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct DefaultSection {
    /// Reservation page (contains the booking reference).
    pub url: String,
    /// Comma separated language codes, e.g. "de, fr".
    #[serde(default = "default_date_languages")]
    pub date_languages: String,
    #[serde(default = "default_true")]
    pub headless: bool,
}

impl Default for DefaultSection {
    fn default() -> Self {
        Self {
            url: String::new(),
            date_languages: default_date_languages(),
            headless: true,
        }
    }
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct TelegramSection {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub telegram_bot_token: String,
    #[serde(default)]
    pub chat_id: String,
    #[serde(default)]
    pub force_notify: bool,
    #[serde(default)]
    pub notify_only_if_earlier: bool,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    #[serde(rename = "DEFAULT")]
    pub default: DefaultSection,
    #[serde(rename = "TELEGRAM", default)]
    pub telegram: TelegramSection,
}

/// A `DATE_LANGUAGES` entry that is not a supported language code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownLanguage(pub String);

impl fmt::Display for UnknownLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<String> = DateLanguage::iter().map(|l| l.to_string()).collect();
        write!(
            f,
            "Unknown date language '{}' (expected one of: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownLanguage {}

/// Parses a list such as `"de, FR"`. Empty entries are ignored, duplicates collapse.
pub fn parse_date_languages(raw: &str) -> Result<Vec<DateLanguage>, UnknownLanguage> {
    let mut langs = Vec::new();
    for code in raw.split(',').map(str::trim).filter(|c| !c.is_empty()) {
        let lang = DateLanguage::from_str(code).map_err(|_| UnknownLanguage(code.to_string()))?;
        if !langs.contains(&lang) {
            langs.push(lang);
        }
    }
    Ok(langs)
}

impl Config {
    /// Load the configuration from disk using an explicit context.
    ///
    /// A missing, unreadable, unparsable or incomplete file is an error;
    /// the watcher never runs on silent defaults.
    pub fn load(ctx: &dyn AppContext) -> Result<Self> {
        let path = ctx.get_config_file_path()?;

        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config = Self::from_toml(&contents).map_err(|e| {
            anyhow::anyhow!("Invalid config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.default.url.trim().is_empty() {
            anyhow::bail!("DEFAULT.URL must not be empty");
        }
        if self.date_languages()?.is_empty() {
            anyhow::bail!("DEFAULT.DATE_LANGUAGES must name at least one language");
        }
        Ok(())
    }

    /// Helper to detect whether an anyhow::Error indicates that the config file was missing.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    /// Save configuration using an explicit context.
    pub fn save(&self, ctx: &dyn AppContext) -> Result<()> {
        let path = ctx.get_config_file_path()?;
        LocalStorage::with_lock(&path, || {
            let toml_str = toml::to_string_pretty(self)?;
            LocalStorage::atomic_write(&path, toml_str)?;
            Ok(())
        })?;
        Ok(())
    }

    pub fn date_languages(&self) -> Result<Vec<DateLanguage>, UnknownLanguage> {
        parse_date_languages(&self.default.date_languages)
    }

    /// Gating options for the notification decision.
    pub fn policy(&self) -> NotificationPolicy {
        NotificationPolicy {
            force_notify: self.telegram.force_notify,
            notify_only_if_earlier: self.telegram.notify_only_if_earlier,
        }
    }

    /// Telegram is enabled and has the credentials it needs.
    pub fn telegram_ready(&self) -> bool {
        self.telegram.enabled
            && !self.telegram.telegram_bot_token.trim().is_empty()
            && !self.telegram.chat_id.trim().is_empty()
    }

    /// Skeleton written by `slotwatch init`.
    pub fn template(url: &str) -> Self {
        Self {
            default: DefaultSection {
                url: url.to_string(),
                ..DefaultSection::default()
            },
            telegram: TelegramSection::default(),
        }
    }
}
