//! Session commands.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (password from --password or SHOPDESK_PASSWORD)
//! shopdesk login -e admin@shop.test
//!
//! # Show the signed-in admin
//! shopdesk whoami
//!
//! # Sign out
//! shopdesk logout
//! ```

use secrecy::SecretString;
use serde::Serialize;
use shopdesk_admin::AdminConsole;
use shopdesk_admin::session::Session;

use super::{CliError, Output};

#[derive(Serialize)]
struct Identity<'a> {
    user_id: &'a str,
    role: &'a str,
    expires_at: Option<i64>,
}

impl<'a> From<&'a Session> for Identity<'a> {
    fn from(session: &'a Session) -> Self {
        Self {
            user_id: session.user_id(),
            role: session.role().as_str(),
            expires_at: session.expires_at(),
        }
    }
}

pub async fn login(
    console: &AdminConsole,
    out: Output,
    email: &str,
    password: Option<String>,
) -> Result<(), CliError> {
    let password = password
        .filter(|p| !p.is_empty())
        .map(SecretString::from)
        .ok_or(CliError::MissingPassword)?;

    let session = console.login(email, &password).await?;
    out.record(
        &Identity::from(&session),
        format!("Signed in as admin (user {})", session.user_id()),
    )
}

pub async fn logout(console: &AdminConsole, out: Output) -> Result<(), CliError> {
    console.logout().await?;
    out.line("Signed out")
}

pub async fn whoami(console: &AdminConsole, out: Output) -> Result<(), CliError> {
    let session = console.whoami().await?;
    out.record(
        &Identity::from(&session),
        format!("user {} ({})", session.user_id(), session.role()),
    )
}
