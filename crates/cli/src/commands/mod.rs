//! Subcommand implementations. Each module is one console page.

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod users;

use std::fmt::Display;
use std::io::{self, Write};

use serde::Serialize;
use shopdesk_admin::{AdminError, ResourceView};
use thiserror::Error;

/// Errors surfaced by a command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Admin(#[from] AdminError),

    #[error("Password is required (use --password or SHOPDESK_PASSWORD)")]
    MissingPassword,

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Message shown to the operator.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Admin(e) => e.user_message(),
            other => other.to_string(),
        }
    }
}

/// Writes command results to stdout as text tables or JSON.
#[derive(Debug, Clone, Copy)]
pub struct Output {
    json: bool,
}

impl Output {
    pub const fn new(json: bool) -> Self {
        Self { json }
    }

    pub const fn is_json(&self) -> bool {
        self.json
    }

    /// Render the view's filtered collection.
    pub fn view<V>(&self, view: &V) -> Result<(), CliError>
    where
        V: ResourceView,
        V::Entity: Serialize,
    {
        if self.json {
            return self.json_value(&view.visible());
        }
        let mut out = io::stdout().lock();
        out.write_all(view.table().render().as_bytes())?;
        Ok(())
    }

    /// Print a single record (JSON mode) or a confirmation line (text mode).
    pub fn record<T: Serialize>(&self, record: &T, message: impl Display) -> Result<(), CliError> {
        if self.json {
            return self.json_value(record);
        }
        self.line(message)
    }

    /// Print a plain line. Suppressed in JSON mode.
    pub fn line(&self, message: impl Display) -> Result<(), CliError> {
        if self.json {
            return Ok(());
        }
        writeln!(io::stdout().lock(), "{message}")?;
        Ok(())
    }

    fn json_value<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), CliError> {
        let mut out = io::stdout().lock();
        serde_json::to_writer_pretty(&mut out, value)?;
        writeln!(out)?;
        Ok(())
    }
}
