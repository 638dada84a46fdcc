use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminCommand {
    Start,
    Help,
    Health,
    Stats,
    Users { page: u32 },
    Info { user_id: i64 },
    Grant { user_id: i64, days: Option<i32> },
    Revoke { user_id: i64 },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("{reason}")]
    Invalid { command: &'static str, reason: String },

    #[error("unknown command '{0}'")]
    Unknown(String),
}

impl AdminCommand {
    /// Telegram menu entries, in display order.
    pub const MENU: &'static [(&'static str, &'static str)] = &[
        ("start", "Show the welcome message"),
        ("help", "List admin commands"),
        ("stats", "Subscription statistics"),
        ("users", "List users, 10 per page"),
        ("info", "Show one user"),
        ("grant", "Grant or extend a subscription"),
        ("revoke", "Revoke a subscription"),
        ("health", "Backend health"),
    ];
}

pub fn usage(command: &str) -> &'static str {
    match command {
        "users" => "/users [page]",
        "info" | "userinfo" => "/info <user_id>",
        "grant" => "/grant <user_id> [days]",
        "revoke" => "/revoke <user_id>",
        "stats" => "/stats",
        "health" => "/health",
        _ => "/help",
    }
}

/// Parses `/grant@MyBot 123 30` style text.
pub fn parse(text: &str) -> Result<AdminCommand, CommandError> {
    let mut parts = text.split_whitespace();
    let Some(head) = parts.next() else {
        return Err(CommandError::Unknown(String::new()));
    };
    let name = head.strip_prefix('/').unwrap_or(head);
    let name = name.split('@').next().unwrap_or(name).to_lowercase();
    let args: Vec<&str> = parts.collect();

    let cmd = match name.as_str() {
        "start" => AdminCommand::Start,
        "help" => AdminCommand::Help,
        "health" => no_args("health", &args, AdminCommand::Health)?,
        "stats" => no_args("stats", &args, AdminCommand::Stats)?,
        "users" => {
            max_args("users", &args, 1)?;
            let page = match args.first() {
                Some(raw) => page_arg(raw)?,
                None => 1,
            };
            AdminCommand::Users { page }
        }
        "info" | "userinfo" => {
            let user_id = one_user_id("info", &args)?;
            AdminCommand::Info { user_id }
        }
        "grant" => {
            max_args("grant", &args, 2)?;
            let Some(raw_id) = args.first() else {
                return Err(invalid("grant", "missing user id"));
            };
            let user_id = user_id_arg("grant", raw_id)?;
            let days = args.get(1).map(|raw| days_arg(raw)).transpose()?;
            AdminCommand::Grant { user_id, days }
        }
        "revoke" => {
            let user_id = one_user_id("revoke", &args)?;
            AdminCommand::Revoke { user_id }
        }
        _ => return Err(CommandError::Unknown(name)),
    };
    Ok(cmd)
}

fn invalid(command: &'static str, reason: impl Into<String>) -> CommandError {
    CommandError::Invalid { command, reason: reason.into() }
}

fn no_args(command: &'static str, args: &[&str], cmd: AdminCommand) -> Result<AdminCommand, CommandError> {
    max_args(command, args, 0)?;
    Ok(cmd)
}

fn max_args(command: &'static str, args: &[&str], max: usize) -> Result<(), CommandError> {
    if args.len() > max {
        return Err(invalid(command, "too many arguments"));
    }
    Ok(())
}

fn one_user_id(command: &'static str, args: &[&str]) -> Result<i64, CommandError> {
    max_args(command, args, 1)?;
    match args.first() {
        Some(raw) => user_id_arg(command, raw),
        None => Err(invalid(command, "missing user id")),
    }
}

fn user_id_arg(command: &'static str, raw: &str) -> Result<i64, CommandError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(invalid(command, format!("'{}' is not a valid user id", raw))),
    }
}

fn days_arg(raw: &str) -> Result<i32, CommandError> {
    match raw.parse::<i32>() {
        Ok(days) if days > 0 => Ok(days),
        _ => Err(invalid("grant", format!("'{}' is not a positive number of days", raw))),
    }
}

fn page_arg(raw: &str) -> Result<u32, CommandError> {
    match raw.parse::<u32>() {
        Ok(page) if page > 0 => Ok(page),
        _ => Err(invalid("users", format!("'{}' is not a valid page number", raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_slash_and_bot_suffix() {
        assert_eq!(parse("/stats").unwrap(), AdminCommand::Stats);
        assert_eq!(parse("/stats@OsintAdminBot").unwrap(), AdminCommand::Stats);
        assert_eq!(parse("  STATS ").unwrap(), AdminCommand::Stats);
        assert_eq!(parse("/userinfo 5").unwrap(), AdminCommand::Info { user_id: 5 });
    }

    #[test]
    fn grant_days_are_optional() {
        assert_eq!(
            parse("/grant 123456789 21").unwrap(),
            AdminCommand::Grant { user_id: 123456789, days: Some(21) }
        );
        assert_eq!(parse("/grant 123456789").unwrap(), AdminCommand::Grant { user_id: 123456789, days: None });
    }

    #[test]
    fn users_defaults_to_first_page() {
        assert_eq!(parse("/users").unwrap(), AdminCommand::Users { page: 1 });
        assert_eq!(parse("/users 3").unwrap(), AdminCommand::Users { page: 3 });
    }

    #[test]
    fn malformed_arguments_name_the_command() {
        let cases = [
            ("/grant", "grant"),
            ("/grant abc", "grant"),
            ("/grant -4", "grant"),
            ("/grant 12 0", "grant"),
            ("/grant 12 -3", "grant"),
            ("/grant 12 x", "grant"),
            ("/revoke", "revoke"),
            ("/revoke 0", "revoke"),
            ("/info", "info"),
            ("/users 0", "users"),
            ("/users two", "users"),
            ("/stats now", "stats"),
        ];
        for (text, expected) in cases {
            match parse(text) {
                Err(CommandError::Invalid { command, .. }) => assert_eq!(command, expected, "{text}"),
                other => panic!("{text}: expected Invalid, got {other:?}"),
            }
        }
    }

    #[test]
    fn unknown_commands() {
        assert_eq!(parse("/broadcast hi"), Err(CommandError::Unknown("broadcast".into())));
        assert_eq!(parse(""), Err(CommandError::Unknown(String::new())));
    }
}
