use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    pub user_id: i64,
    pub handle: Option<String>,
}

/// Static allow-list of admin user ids. Built once at startup and shared;
/// there is no way to change it afterwards.
#[derive(Debug, Clone)]
pub struct AdminGate {
    admins: Arc<BTreeMap<i64, AdminIdentity>>,
}

impl AdminGate {
    pub fn new(admins: impl IntoIterator<Item = AdminIdentity>) -> Self {
        let admins = admins.into_iter().map(|a| (a.user_id, a)).collect();
        Self { admins: Arc::new(admins) }
    }

    pub fn from_ids(ids: &[i64]) -> Self {
        Self::new(ids.iter().map(|&user_id| AdminIdentity { user_id, handle: None }))
    }

    /// Parses `ADMIN_USER_IDS`.
    pub fn from_config(raw: &str) -> Result<Self> {
        Ok(Self::new(parse_admin_list(raw)?))
    }

    pub fn authorize(&self, caller_id: i64) -> bool {
        self.admins.contains_key(&caller_id)
    }

    pub fn identity(&self, caller_id: i64) -> Option<&AdminIdentity> {
        self.admins.get(&caller_id)
    }

    pub fn admin_count(&self) -> usize {
        self.admins.len()
    }
}

/// Parses `"5682019164:boyonthegrid, 1844138085"`. A leading `@` on the handle is dropped.
pub fn parse_admin_list(raw: &str) -> Result<Vec<AdminIdentity>> {
    let mut admins = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let (id, handle) = match entry.split_once(':') {
            Some((id, handle)) => (id.trim(), Some(handle.trim().trim_start_matches('@'))),
            None => (entry, None),
        };
        let user_id: i64 = id
            .parse()
            .with_context(|| format!("Invalid admin user id '{}'", id))?;
        if user_id <= 0 {
            bail!("Admin user id must be positive, got {}", user_id);
        }
        admins.push(AdminIdentity {
            user_id,
            handle: handle.filter(|h| !h.is_empty()).map(str::to_string),
        });
    }
    if admins.is_empty() {
        bail!("Admin allow-list is empty");
    }
    Ok(admins)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_ids_with_optional_handles() {
        let admins = parse_admin_list("5682019164:@boyonthegrid, 1844138085").unwrap();
        assert_eq!(admins.len(), 2);
        assert_eq!(admins[0].user_id, 5682019164);
        assert_eq!(admins[0].handle.as_deref(), Some("boyonthegrid"));
        assert_eq!(admins[1].handle, None);
    }

    #[test]
    fn rejects_bad_lists() {
        assert!(parse_admin_list("").is_err());
        assert!(parse_admin_list(" , ").is_err());
        assert!(parse_admin_list("abc").is_err());
        assert!(parse_admin_list("-5").is_err());
    }

    #[test]
    fn authorize_checks_membership_only() {
        let gate = AdminGate::from_config("5682019164:boyonthegrid,1844138085:ded_xdk").unwrap();
        assert!(gate.authorize(5682019164));
        assert!(gate.authorize(1844138085));
        assert!(!gate.authorize(999999999));
        assert_eq!(gate.identity(1844138085).and_then(|a| a.handle.as_deref()), Some("ded_xdk"));
        assert_eq!(gate.admin_count(), 2);
    }
}
