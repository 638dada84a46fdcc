use crate::BotState;
use crate::bot::keyboards::{pagination_keyboard, parse_page_callback};
use osint_admin_core::receiver;
use teloxide::prelude::*;
use tracing::{debug, error};

/// Page buttons re-run `/users <n>` through the receiver and edit the listing in place.
pub async fn callback_handler(bot: Bot, q: CallbackQuery, state: BotState) -> Result<(), teloxide::RequestError> {
    let _ = bot.answer_callback_query(q.id.clone()).await;

    let Some(page) = q.data.as_deref().and_then(parse_page_callback) else {
        debug!("Ignoring callback: {:?}", q.data);
        return Ok(());
    };
    let caller_id = q.from.id.0 as i64;

    let reply = receiver::handle(state.backend.as_ref(), caller_id, &format!("/users {}", page)).await;

    let result = match q.message {
        Some(msg) => {
            let mut request = bot.edit_message_text(msg.chat().id, msg.id(), reply.text);
            if let Some(pagination) = reply.pagination {
                request = request.reply_markup(pagination_keyboard(&pagination));
            }
            request.await.map(|_| ())
        }
        None => {
            let mut request = bot.send_message(q.from.id, reply.text);
            if let Some(pagination) = reply.pagination {
                request = request.reply_markup(pagination_keyboard(&pagination));
            }
            request.await.map(|_| ())
        }
    };
    if let Err(e) = result {
        error!("Failed to update user list for {}: {}", caller_id, e);
    }
    Ok(())
}
