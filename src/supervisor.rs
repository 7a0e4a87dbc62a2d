use std::{future::Future, sync::Arc};

use teloxide::{
    dispatching::{DefaultKey, ShutdownToken},
    prelude::*,
};
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    bot::{
        build_dispatcher, test_redis_connection, BotContext, BotError, BotSettings, RedisStore,
    },
    errors::LifecycleError,
};

/* Supervisor owns the single bot instance of this process.
 * Start and stop both hold the lock for their whole transition,
 * so two bots can never run side by side.
 */

// A bot whose dispatcher runs on its own task.
pub struct RunningBot {
    username: String,
    shutdown: ShutdownToken,
    task: JoinHandle<()>,
}

impl RunningBot {
    pub fn spawn(username: String, mut dispatcher: Dispatcher<Bot, BotError, DefaultKey>) -> Self {
        let shutdown = dispatcher.shutdown_token();
        let task = tokio::spawn(async move { dispatcher.dispatch().await });
        RunningBot {
            username,
            shutdown,
            task,
        }
    }

    // A bot whose task never ends and never talks to Telegram.
    #[cfg(test)]
    pub(crate) fn idle(username: &str) -> Self {
        let store = RedisStore::open("redis://127.0.0.1/").expect("static redis url");
        let ctx = Arc::new(BotContext::new(BotSettings::default(), store));
        let dispatcher = build_dispatcher(Bot::new("0:test"), ctx);
        RunningBot {
            username: username.to_string(),
            shutdown: dispatcher.shutdown_token(),
            task: tokio::spawn(std::future::pending()),
        }
    }

    // Stops the dispatcher and waits for its task to end.
    pub async fn shutdown(self) {
        let RunningBot {
            username,
            shutdown,
            task,
        } = self;

        match shutdown.shutdown() {
            Ok(stopped) => stopped.await,
            // Not polling yet, or already stopped on its own
            Err(_) => task.abort(),
        }

        match task.await {
            Ok(()) => log::info!("Stop Bot - Bot @{} stopped", username),
            Err(err) if err.is_cancelled() => {
                log::info!("Stop Bot - Bot @{} cancelled", username)
            }
            Err(err) => log::error!(
                "Stop Bot - Bot @{} task failed: {}",
                username,
                err.to_string()
            ),
        }
    }
}

#[derive(Default)]
pub struct BotSupervisor {
    running: Mutex<Option<RunningBot>>,
}

impl BotSupervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /* Starts a bot with `launch` unless one is already running.
     * `launch` is only called once the slot is known to be free.
     * Returns the username of the started bot.
     */
    pub async fn start<F, Fut>(&self, launch: F) -> Result<String, LifecycleError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<RunningBot, LifecycleError>>,
    {
        let mut running = self.running.lock().await;
        if let Some(bot) = running.as_ref() {
            if !bot.task.is_finished() {
                return Err(LifecycleError::AlreadyRunning);
            }
            log::warn!(
                "Start Bot - Bot @{} stopped on its own, replacing it",
                bot.username
            );
            if let Some(stale) = running.take() {
                stale.shutdown().await;
            }
        }

        let bot = launch().await?;
        let username = bot.username.clone();
        *running = Some(bot);
        Ok(username)
    }

    pub async fn stop(&self) -> Result<(), LifecycleError> {
        let mut running = self.running.lock().await;
        let bot = running.take().ok_or(LifecycleError::NotRunning)?;
        // Held until the dispatcher is down, so a new start cannot overlap it
        bot.shutdown().await;
        Ok(())
    }

    #[cfg(test)]
    pub async fn running_username(&self) -> Option<String> {
        let running = self.running.lock().await;
        running.as_ref().map(|bot| bot.username.clone())
    }
}

fn start_failed<E: ToString>(err: E) -> LifecycleError {
    LifecycleError::StartFailed(err.to_string())
}

/* Connects to the shop database, logs in to Telegram and spawns the dispatcher.
 * Nothing is spawned unless both succeed.
 */
pub async fn launch_bot(
    token: &str,
    settings: BotSettings,
    database_uri: &str,
) -> Result<RunningBot, LifecycleError> {
    let store = RedisStore::open(database_uri).map_err(start_failed)?;
    let mut con = store.connect().await.map_err(start_failed)?;
    if !test_redis_connection(&mut con).await.map_err(start_failed)? {
        return Err(start_failed("shop database did not echo the test key"));
    }

    let bot = Bot::new(token);
    let me = bot.get_me().await.map_err(start_failed)?;
    let username = me
        .user
        .username
        .clone()
        .unwrap_or_else(|| me.user.first_name.clone());

    let ctx = Arc::new(BotContext::new(settings, store));
    let dispatcher = build_dispatcher(bot, ctx);
    log::info!("Start Bot - Bot @{} is starting", username);
    Ok(RunningBot::spawn(username, dispatcher))
}
