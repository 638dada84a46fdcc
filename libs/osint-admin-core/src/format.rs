//! Plain-text replies for the Telegram bot.

use crate::command::usage as usage_line;
use crate::error::AdminError;
use crate::wire::{GrantOutcome, HealthReport, RevokeOutcome, Stats, UserDetail, UsersPage};
use chrono::{DateTime, Utc};

pub fn date(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

fn opt_date(ts: Option<DateTime<Utc>>) -> String {
    ts.map(date).unwrap_or_else(|| "never".to_string())
}

/// `1234567` -> `1,234,567`.
pub fn group_thousands(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Two decimals with grouped thousands: `8379.0` -> `8,379.00`.
pub fn money(amount: f64) -> String {
    let cents = (amount * 100.0).round() as i64;
    format!("{}.{:02}", group_thousands(cents / 100), (cents % 100).abs())
}

pub fn welcome(handle: Option<&str>) -> String {
    let greeting = match handle {
        Some(h) => format!("Welcome, @{}.", h),
        None => "Welcome, admin.".to_string(),
    };
    format!("{}\n\n{}", greeting, help())
}

pub fn help() -> String {
    [
        "OSINT subscription admin",
        "",
        "/stats - subscription statistics",
        "/users [page] - list users, 10 per page",
        "/info <user_id> - user details",
        "/grant <user_id> [days] - grant or extend (default 21 days)",
        "/revoke <user_id> - end a subscription now",
        "/health - backend health",
        "/help - this message",
    ]
    .join("\n")
}

pub fn access_denied() -> String {
    "⛔ Access denied. This bot is restricted to administrators.".to_string()
}

pub fn usage(command: &str, reason: &str) -> String {
    format!("⚠️ {}\nUsage: {}", reason, usage_line(command))
}

pub fn stats(s: &Stats) -> String {
    format!(
        "📊 Statistics\n\n\
         Users: {}\n\
         Active subscriptions: {}\n\
         Expired: {}\n\
         Never subscribed: {}\n\
         Conversion: {:.1}%\n\n\
         Queries used: {}\n\
         Grants: {} | Revokes: {}\n\n\
         Price: {} {}\n\
         Est. revenue (30 days): {} {}\n\
         Est. daily revenue: {} {}\n\n\
         As of {}",
        group_thousands(s.total_users),
        group_thousands(s.active_subscriptions),
        group_thousands(s.expired_subscriptions),
        group_thousands(s.never_subscribed),
        s.conversion_rate,
        group_thousands(s.total_queries),
        group_thousands(s.grants_total),
        group_thousands(s.revokes_total),
        s.currency,
        money(s.subscription_price),
        s.currency,
        money(s.estimated_revenue),
        s.currency,
        money(s.estimated_daily_revenue),
        date(s.generated_at),
    )
}

pub fn users_page(p: &UsersPage) -> String {
    let mut out = format!(
        "👥 Users (page {}/{}, {} total)\n",
        p.page,
        p.total_pages,
        group_thousands(p.total_users)
    );
    if p.users.is_empty() {
        out.push_str("\nNo users on this page.");
        return out;
    }
    let first = u64::from(p.page.saturating_sub(1)) * u64::from(p.page_size);
    for (i, user) in p.users.iter().enumerate() {
        let status = if user.is_active_at(p.as_of) {
            format!("active until {}", date(user.subscription_end_date.unwrap_or(p.as_of)))
        } else {
            "inactive".to_string()
        };
        out.push_str(&format!(
            "\n{}. {} ({})\n   {} | joined {}",
            first + i as u64 + 1,
            user.display_name(),
            user.user_id,
            status,
            user.created_at.format("%Y-%m-%d"),
        ));
    }
    out
}

pub fn user_detail(d: &UserDetail) -> String {
    let u = &d.user;
    let status = if d.is_active {
        format!("✅ Active, {} day(s) left", d.days_remaining)
    } else {
        "❌ Inactive".to_string()
    };
    let mut out = format!(
        "👤 {}\n\n\
         ID: {}\n\
         Username: {}\n\
         Name: {}\n\
         Status: {}\n\
         Started: {}\n\
         Expires: {}\n\
         Queries used: {}\n\
         Joined: {}",
        u.display_name(),
        u.user_id,
        u.username.as_deref().map(|n| format!("@{}", n)).unwrap_or_else(|| "-".to_string()),
        full_name(u.first_name.as_deref(), u.last_name.as_deref()),
        status,
        opt_date(u.subscription_start_date),
        opt_date(u.subscription_end_date),
        group_thousands(u.queries_used),
        date(u.created_at),
    );
    if !d.recent_events.is_empty() {
        out.push_str("\n\nRecent changes:");
        for e in &d.recent_events {
            let days = e.days.map(|n| format!(" {}d", n)).unwrap_or_default();
            out.push_str(&format!("\n- {} {}{} by {}", date(e.created_at), e.action, days, e.admin_id));
        }
    }
    out.push_str(&format!("\n\n/grant {} [days]\n/revoke {}", u.user_id, u.user_id));
    out
}

fn full_name(first: Option<&str>, last: Option<&str>) -> String {
    let name = [first, last]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if name.is_empty() { "-".to_string() } else { name }
}

pub fn granted(g: &GrantOutcome) -> String {
    format!(
        "✅ Granted {} day(s) to user {}.\nExpires: {}\nPrevious expiry: {}\nRecorded: {} {}",
        g.days,
        g.user_id,
        date(g.expires_at),
        opt_date(g.previous_expiry),
        g.currency,
        money(g.amount),
    )
}

pub fn revoked(r: &RevokeOutcome) -> String {
    if r.was_active {
        format!(
            "🚫 Subscription revoked for user {}.\nWas valid until: {}\nEnded: {}",
            r.user_id,
            opt_date(r.previous_expiry),
            opt_date(r.expires_at),
        )
    } else {
        format!(
            "ℹ️ User {} had no active subscription. Expiry unchanged: {}",
            r.user_id,
            opt_date(r.expires_at),
        )
    }
}

pub fn health(h: &HealthReport, backend: &str) -> String {
    let icon = if h.is_healthy() { "🟢" } else { "🔴" };
    format!(
        "{} Backend {} ({})\nDatabase: {}\nUptime: {}s\nVersion: {}\nChecked: {}",
        icon,
        h.status,
        backend,
        h.database,
        h.uptime_seconds,
        h.version,
        date(h.timestamp),
    )
}

pub fn error(err: &AdminError) -> String {
    match err {
        AdminError::Unauthorized => access_denied(),
        AdminError::NotFound(id) => format!("🔍 User {} not found.", id),
        AdminError::InvalidArgument(msg) => format!("⚠️ Invalid argument: {}", msg),
        AdminError::StoreUnavailable(_) => {
            "🛠 The subscription database is unavailable right now. Please try again shortly.".to_string()
        }
    }
}
