use crate::BotState;
use std::future::Future;
use std::sync::Arc;
use teloxide::{dptree, prelude::*, types::Update};
use tracing::{error, info, warn};

pub mod handlers;
pub mod keyboards;

pub async fn run_bot(bot: Bot, state: BotState, shutdown: impl Future<Output = ()>) {
    info!("Starting admin bot dispatcher ({} backend)...", state.backend.describe());

    match bot.get_me().await {
        Ok(me) => {
            let username = me.username.clone().unwrap_or_else(|| "unknown".into());
            info!("Bot connected as: @{}", username);
        }
        Err(e) => {
            error!("Bot failed to connect to Telegram: {}", e);
            return;
        }
    }

    if let Err(e) = bot.set_my_commands(keyboards::bot_commands()).await {
        warn!("Failed to register command menu: {}", e);
    }

    let message_handler = Update::filter_message().endpoint(handlers::command::message_handler);
    let callback_handler = Update::filter_callback_query().endpoint(handlers::callback::callback_handler);

    let mut dispatcher = Dispatcher::builder(
        bot,
        dptree::entry().branch(message_handler).branch(callback_handler),
    )
    .dependencies(dptree::deps![state])
    .default_handler(|upd: Arc<Update>| async move {
        info!("Unhandled update: {:?}", upd.id);
    })
    .build();

    tokio::select! {
        _ = dispatcher.dispatch() => {
            info!("Bot dispatcher exited");
        }
        _ = shutdown => {
            info!("Bot received shutdown signal, stopping...");
        }
    }
}
