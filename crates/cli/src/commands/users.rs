//! Users page.
//!
//! # Usage
//!
//! ```bash
//! shopdesk users list            # customers only
//! shopdesk users list --all
//! shopdesk users edit 12 --name "Asha Rao" --role admin
//! shopdesk users block 12
//! shopdesk users delete 12
//! ```

use shopdesk_admin::models::UserUpdate;
use shopdesk_admin::{AdminConsole, AdminError, ResourceView};
use shopdesk_core::{UserId, UserRole};

use super::{CliError, Output};

pub async fn list(
    console: &AdminConsole,
    out: Output,
    role: Option<UserRole>,
    all: bool,
) -> Result<(), CliError> {
    let mut view = console.users().await?;
    if all {
        view.set_role_filter(None);
    } else if role.is_some() {
        view.set_role_filter(role);
    }
    view.list().await?;
    out.view(&view)
}

/// Fields left as `None` keep their current value.
pub struct EditArgs {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub address: Option<String>,
    pub avatar_url: Option<String>,
}

pub async fn edit(
    console: &AdminConsole,
    out: Output,
    id: UserId,
    args: EditArgs,
) -> Result<(), CliError> {
    let mut view = console.users().await?;
    view.list().await?;

    let current = UserUpdate::from_user(view.cache().require(id).map_err(AdminError::from)?);
    let update = UserUpdate::new(
        args.name.as_deref().unwrap_or(&current.full_name),
        args.role.unwrap_or(current.role),
        args.address.as_deref().or(Some(current.address.as_str())),
        args.avatar_url.as_deref().or(Some(current.avatar_url.as_str())),
    )
    .map_err(AdminError::from)?;

    let user = view.update(id, &update).await?;
    out.record(&user, format!("Updated user {} ({})", user.id, user.full_name))
}

pub async fn set_blocked(
    console: &AdminConsole,
    out: Output,
    id: UserId,
    blocked: bool,
) -> Result<(), CliError> {
    let mut view = console.users().await?;
    view.list().await?;

    let user = if blocked {
        view.block(id).await?
    } else {
        view.unblock(id).await?
    };
    let verb = if blocked { "Blocked" } else { "Unblocked" };
    out.record(&user, format!("{verb} user {} ({})", user.id, user.full_name))
}

pub async fn delete(console: &AdminConsole, out: Output, id: UserId) -> Result<(), CliError> {
    let mut view = console.users().await?;
    view.list().await?;
    view.delete(id).await?;
    out.line(format!("Deleted user {id}"))
}
