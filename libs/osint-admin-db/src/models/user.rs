use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A bot user as registered by the OSINT bot.
///
/// The subscription is a single time window. A user is active while
/// `subscription_end_date` lies strictly in the future; the stored
/// `subscription_status` column is informational only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub subscription_start_date: Option<DateTime<Utc>>,
    pub subscription_end_date: Option<DateTime<Utc>>,
    pub queries_used: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.subscription_end_date.is_some_and(|end| end > now)
    }

    /// Whole days left, rounded up. Zero once the window has closed.
    pub fn days_remaining(&self, now: DateTime<Utc>) -> i64 {
        match self.subscription_end_date {
            Some(end) if end > now => {
                let secs = (end - now).num_seconds();
                (secs + 86_399) / 86_400
            }
            _ => 0,
        }
    }

    pub fn display_name(&self) -> String {
        let full = match (self.first_name.as_deref(), self.last_name.as_deref()) {
            (Some(f), Some(l)) if !f.is_empty() && !l.is_empty() => format!("{} {}", f, l),
            (Some(f), _) if !f.is_empty() => f.to_string(),
            (_, Some(l)) if !l.is_empty() => l.to_string(),
            _ => String::new(),
        };
        if !full.is_empty() {
            return full;
        }
        match self.username.as_deref() {
            Some(u) if !u.is_empty() => format!("@{}", u),
            _ => format!("User {}", self.user_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user(end: Option<DateTime<Utc>>) -> User {
        User {
            user_id: 42,
            username: Some("ghost".into()),
            first_name: None,
            last_name: None,
            subscription_start_date: None,
            subscription_end_date: end,
            queries_used: 0,
            created_at: Utc::now(),
            updated_at: None,
        }
    }

    #[test]
    fn active_only_when_end_is_in_the_future() {
        let now = Utc::now();
        assert!(user(Some(now + Duration::hours(1))).is_active_at(now));
        assert!(!user(Some(now)).is_active_at(now));
        assert!(!user(Some(now - Duration::days(1))).is_active_at(now));
        assert!(!user(None).is_active_at(now));
    }

    #[test]
    fn days_remaining_rounds_up() {
        let now = Utc::now();
        assert_eq!(user(Some(now + Duration::hours(1))).days_remaining(now), 1);
        assert_eq!(user(Some(now + Duration::days(21))).days_remaining(now), 21);
        assert_eq!(user(Some(now - Duration::days(2))).days_remaining(now), 0);
        assert_eq!(user(None).days_remaining(now), 0);
    }

    #[test]
    fn display_name_falls_back_to_username_then_id() {
        let mut u = user(None);
        assert_eq!(u.display_name(), "@ghost");
        u.first_name = Some("Ada".into());
        assert_eq!(u.display_name(), "Ada");
        u.last_name = Some("Lovelace".into());
        assert_eq!(u.display_name(), "Ada Lovelace");
        let bare = User { username: None, first_name: None, last_name: None, ..user(None) };
        assert_eq!(bare.display_name(), "User 42");
    }
}
