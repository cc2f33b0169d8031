use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use tally_core::DEFAULT_PRIORITY_PHRASE;
use tally_finance::{PipelineOptions, DEFAULT_STATEMENT};
use tally_ingest::default_date_formats;

use crate::state::{ensure_tally_home, tally_home};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub statement: StatementSection,
    pub display: DisplaySection,
    pub log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementSection {
    /// Read when no --csv is given; empty string disables the lookup
    pub default_path: String,
    /// Single ASCII character
    pub delimiter: String,
    pub date_formats: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    pub currency_suffix: String,
    /// Rows whose description contains this sort last within a day
    pub priority_phrase: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// tracing filter used when RUST_LOG is unset
    pub level: String,
}

impl Default for StatementSection {
    fn default() -> Self {
        Self {
            default_path: DEFAULT_STATEMENT.to_string(),
            delimiter: ",".to_string(),
            date_formats: default_date_formats(),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            currency_suffix: "kr".to_string(),
            priority_phrase: DEFAULT_PRIORITY_PHRASE.to_string(),
        }
    }
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn delimiter(&self) -> Result<u8> {
        match self.statement.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => bail!(
                "statement.delimiter must be one ASCII character, got {:?}",
                self.statement.delimiter
            ),
        }
    }

    pub fn pipeline_options(&self) -> Result<PipelineOptions> {
        let default_statement = match self.statement.default_path.trim() {
            "" => None,
            p => Some(PathBuf::from(p)),
        };
        Ok(PipelineOptions {
            default_statement,
            delimiter: self.delimiter()?,
            date_formats: self.statement.date_formats.clone(),
        })
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("config.toml"))
}

/// Load `path` (or the default location); a missing file means defaults.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = match path {
        Some(p) => p.to_path_buf(),
        None => config_path()?,
    };
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    toml::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    let p = ensure_tally_home()?.join("config.toml");
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    let written = save_config(&Config::default())?;
    println!("Wrote {}", written.display());
    Ok(())
}
