use crate::backend::AdminBackend;
use crate::command::{self, AdminCommand, CommandError};
use crate::format;
use crate::gate::AdminIdentity;
use crate::wire::UsersPage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub prev: Option<u32>,
    pub next: Option<u32>,
}

impl Pagination {
    fn from_page(page: &UsersPage) -> Option<Self> {
        // Past the end, step back to the last page that has rows.
        let prev = page
            .has_prev
            .then(|| page.page.saturating_sub(1).min(page.total_pages))
            .filter(|p| *p > 0);
        let next = page.has_next.then(|| page.page.saturating_add(1));
        if prev.is_none() && next.is_none() {
            return None;
        }
        Some(Self { page: page.page, prev, next })
    }
}

/// Text to send back, plus page buttons for user listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub pagination: Option<Pagination>,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Self { text: text.into(), pagination: None }
    }
}

/// Runs one inbound command for `caller_id`.
///
/// The caller is checked before the text is even parsed, so a non-admin
/// learns nothing about which commands exist.
pub async fn handle<B>(backend: &B, caller_id: i64, text: &str) -> Reply
where
    B: AdminBackend + ?Sized,
{
    let identity = match backend.verify_admin(caller_id).await {
        Ok(Some(identity)) => identity,
        Ok(None) => {
            tracing::warn!(caller_id, "Denied command from non-admin");
            return Reply::text(format::access_denied());
        }
        Err(e) => {
            tracing::error!(caller_id, "Admin verification failed: {}", e);
            return Reply::text(format::error(&e));
        }
    };

    let cmd = match command::parse(text) {
        Ok(cmd) => cmd,
        Err(CommandError::Unknown(name)) => {
            tracing::debug!(caller_id, command = %name, "Unknown command");
            return Reply::text(format::help());
        }
        Err(CommandError::Invalid { command, reason }) => {
            return Reply::text(format::usage(command, &reason));
        }
    };

    tracing::info!(caller_id, command = ?cmd, backend = backend.describe(), "Admin command");
    run(backend, &identity, cmd).await
}

async fn run<B>(backend: &B, identity: &AdminIdentity, cmd: AdminCommand) -> Reply
where
    B: AdminBackend + ?Sized,
{
    let caller_id = identity.user_id;
    let result = match cmd {
        AdminCommand::Start => Ok(Reply::text(format::welcome(identity.handle.as_deref()))),
        AdminCommand::Help => Ok(Reply::text(format::help())),
        AdminCommand::Health => backend
            .health()
            .await
            .map(|h| Reply::text(format::health(&h, backend.describe()))),
        AdminCommand::Stats => backend.stats(caller_id).await.map(|s| Reply::text(format::stats(&s))),
        AdminCommand::Users { page } => backend.list_users(caller_id, page).await.map(|p| Reply {
            text: format::users_page(&p),
            pagination: Pagination::from_page(&p),
        }),
        AdminCommand::Info { user_id } => backend
            .user_info(caller_id, user_id)
            .await
            .map(|d| Reply::text(format::user_detail(&d))),
        AdminCommand::Grant { user_id, days } => backend
            .grant(caller_id, user_id, days)
            .await
            .map(|g| Reply::text(format::granted(&g))),
        AdminCommand::Revoke { user_id } => backend
            .revoke(caller_id, user_id)
            .await
            .map(|r| Reply::text(format::revoked(&r))),
    };

    result.unwrap_or_else(|e| {
        tracing::warn!(caller_id, kind = ?e.kind(), "Command failed: {}", e);
        Reply::text(format::error(&e))
    })
}
