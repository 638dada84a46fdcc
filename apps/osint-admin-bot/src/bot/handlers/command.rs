use crate::BotState;
use crate::bot::keyboards::pagination_keyboard;
use osint_admin_core::receiver;
use teloxide::prelude::*;
use tracing::error;

pub async fn message_handler(bot: Bot, msg: Message, state: BotState) -> Result<(), teloxide::RequestError> {
    let Some(text) = msg.text() else {
        return Ok(());
    };
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };
    let caller_id = user.id.0 as i64;

    let reply = receiver::handle(state.backend.as_ref(), caller_id, text).await;

    let mut request = bot.send_message(msg.chat.id, reply.text);
    if let Some(pagination) = reply.pagination {
        request = request.reply_markup(pagination_keyboard(&pagination));
    }
    if let Err(e) = request.await {
        error!("Failed to send reply to {}: {}", caller_id, e);
    }
    Ok(())
}
