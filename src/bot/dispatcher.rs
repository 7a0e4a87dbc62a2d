use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use teloxide::{
    dispatching::{DefaultKey, UpdateHandler},
    error_handlers::LoggingErrorHandler,
    prelude::*,
    RequestError,
};

use super::{
    command::{Command, CommandLine},
    handler::{
        action_balance, action_deposit, action_help, action_maintenance, action_set,
        action_set_user, action_unimplemented, MAINTENANCE_MESSAGE,
    },
    message::{ChatMessage, Notifier},
    processor::ProcessError,
    redis::RedisStore,
    store::AccountStore,
};

/* Dispatcher is the entry point of the bot.
 * It receives every message, routes deposit notices to the ingester and
 * prefixed text to exactly one command handler.
 * Handlers never reach for global state, everything they need is in the BotContext.
 */

/* Types */
pub type HandlerResult = Result<(), BotError>;

#[derive(thiserror::Error, Debug)]
pub enum BotError {
    #[error("User error: {0}")]
    UserError(String),
    #[error("Process error: {0}")]
    ProcessError(ProcessError),
    #[error("Request error: {0}")]
    RequestError(RequestError),
}

impl From<RequestError> for BotError {
    fn from(request_error: RequestError) -> BotError {
        BotError::RequestError(request_error)
    }
}

impl From<ProcessError> for BotError {
    fn from(process_error: ProcessError) -> BotError {
        BotError::ProcessError(process_error)
    }
}

// Per-instance settings, supplied when the bot is started.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BotSettings {
    pub prefix: String,
    pub owner_ids: Vec<u64>,
    pub history_channel: Option<i64>,
    pub donation_channel: Option<i64>,
    pub stock_channel: Option<i64>,
    pub store_banner: Option<String>,
}

impl BotSettings {
    pub fn is_owner(&self, user_id: u64) -> bool {
        self.owner_ids.contains(&user_id)
    }
}

pub struct BotContext<S> {
    pub settings: BotSettings,
    pub store: S,
    maintenance: AtomicBool,
}

impl<S> BotContext<S> {
    pub fn new(settings: BotSettings, store: S) -> Self {
        BotContext {
            settings,
            store,
            maintenance: AtomicBool::new(false),
        }
    }

    pub fn is_maintenance(&self) -> bool {
        self.maintenance.load(Ordering::SeqCst)
    }

    #[cfg(test)]
    pub fn set_maintenance(&self, enabled: bool) {
        self.maintenance.store(enabled, Ordering::SeqCst);
    }

    // Flips the maintenance flag, returns the new state.
    pub fn toggle_maintenance(&self) -> bool {
        !self.maintenance.fetch_xor(true, Ordering::SeqCst)
    }
}

/* Routes one incoming message.
 * Automated posts in the donation chat are deposit notices.
 * Prefixed text from a person is a command, subject to the maintenance gate.
 */
pub async fn handle_message<S: AccountStore, N: Notifier>(
    ctx: &BotContext<S>,
    notifier: &N,
    msg: ChatMessage,
) -> HandlerResult {
    if msg.automated && ctx.settings.donation_channel == Some(msg.chat_id) {
        action_deposit(ctx, notifier, &msg).await?;
    }

    let author_id = match msg.author_id {
        Some(id) if !msg.author_is_bot => id,
        _ => return Ok(()),
    };

    let line = match CommandLine::parse(&msg.text, &ctx.settings.prefix) {
        Some(line) => line,
        None => return Ok(()),
    };

    if ctx.is_maintenance() && !ctx.settings.is_owner(author_id) {
        log::info!(
            "Maintenance - Blocked command {} from user {} in chat {}",
            line.name,
            author_id,
            msg.chat_id
        );
        notifier
            .reply(msg.chat_id, msg.message_id, MAINTENANCE_MESSAGE)
            .await?;
        return Ok(());
    }

    let command = match line.command() {
        Some(command) => command,
        None => {
            log::debug!(
                "Dispatch - Unknown command {} from user {} in chat {}",
                line.name,
                author_id,
                msg.chat_id
            );
            return Ok(());
        }
    };

    match command {
        Command::Help => action_help(ctx, notifier, &msg, author_id).await,
        Command::Set => action_set(ctx, notifier, &msg, author_id, &line.args).await,
        Command::SetUser => action_set_user(ctx, notifier, &msg, author_id, &line.args).await,
        Command::Bal => action_balance(ctx, notifier, &msg, author_id).await,
        Command::SetMaintenance => action_maintenance(ctx, notifier, &msg, author_id).await,
        Command::Info
        | Command::AddBal
        | Command::AddSaldo
        | Command::AddProduct
        | Command::AddStock
        | Command::Stock
        | Command::Buy
        | Command::ChangePrice
        | Command::ChangeRp
        | Command::ChangeName
        | Command::Remove
        | Command::Depo
        | Command::ChangeWorld
        | Command::Send => action_unimplemented(command, &msg, author_id),
    }
}

async fn action_message(
    bot: Bot,
    msg: Message,
    ctx: Arc<BotContext<RedisStore>>,
) -> HandlerResult {
    handle_message(&ctx, &bot, ChatMessage::from_telegram(&msg)).await
}

fn schema() -> UpdateHandler<BotError> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(action_message))
        .branch(Update::filter_channel_post().endpoint(action_message))
}

/* Builds the dispatcher for one bot instance.
 * No Ctrl-C handler: the instance is stopped through its shutdown token.
 */
pub fn build_dispatcher(
    bot: Bot,
    ctx: Arc<BotContext<RedisStore>>,
) -> Dispatcher<Bot, BotError, DefaultKey> {
    Dispatcher::builder(bot, schema())
        .dependencies(dptree::deps![ctx])
        .default_handler(|update| async move {
            log::debug!("Dispatch - Unhandled update: {:?}", update.kind);
        })
        .error_handler(LoggingErrorHandler::with_custom_text(
            "An error has occurred in the dispatcher",
        ))
        .build()
}
