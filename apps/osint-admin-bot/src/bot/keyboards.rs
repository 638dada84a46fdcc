use osint_admin_core::command::AdminCommand;
use osint_admin_core::receiver::Pagination;
use teloxide::types::{BotCommand, InlineKeyboardButton, InlineKeyboardMarkup};

const PAGE_PREFIX: &str = "users_page_";

pub fn page_callback(page: u32) -> String {
    format!("{}{}", PAGE_PREFIX, page)
}

pub fn parse_page_callback(data: &str) -> Option<u32> {
    data.strip_prefix(PAGE_PREFIX)?.parse().ok().filter(|p| *p > 0)
}

pub fn pagination_keyboard(p: &Pagination) -> InlineKeyboardMarkup {
    let mut row = Vec::new();
    if let Some(prev) = p.prev {
        row.push(InlineKeyboardButton::callback("⬅️ Prev", page_callback(prev)));
    }
    if let Some(next) = p.next {
        row.push(InlineKeyboardButton::callback("Next ➡️", page_callback(next)));
    }
    InlineKeyboardMarkup::new(vec![row])
}

pub fn bot_commands() -> Vec<BotCommand> {
    AdminCommand::MENU
        .iter()
        .map(|(name, description)| BotCommand::new(*name, *description))
        .collect()
}
