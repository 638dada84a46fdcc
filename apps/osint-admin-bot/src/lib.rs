pub mod api_client;
pub mod bot;
pub mod config;
pub mod state;

pub use state::BotState;
