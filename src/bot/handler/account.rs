use teloxide::utils::html;

use crate::bot::{
    dispatcher::{BotContext, HandlerResult},
    message::{Card, ChatMessage, Notifier},
    processor::{register_name, retrieve_account, ProcessError},
    store::{AccountStore, NameClaim},
};

use super::{
    constants::{NO_PERMISSION_MESSAGE, UNKNOWN_ERROR_MESSAGE, WORLD_LOCK_EMOJI},
    utils::{format_amount, parse_user_id},
};

/* Utilities */

fn mention(user_id: u64) -> String {
    format!("<a href=\"tg://user?id={user_id}\">{user_id}</a>")
}

async fn reply_process_error<N: Notifier>(
    notifier: &N,
    msg: &ChatMessage,
    err: ProcessError,
) -> HandlerResult {
    notifier
        .reply(
            msg.chat_id,
            msg.message_id,
            &format!("{UNKNOWN_ERROR_MESSAGE}\n{}", html::escape(&err.to_string())),
        )
        .await
}

/* Claims a name for `target` and reports the outcome.
 * `confirmation` is the reply sent once the name is set.
 */
async fn assign_name<S: AccountStore, N: Notifier>(
    ctx: &BotContext<S>,
    notifier: &N,
    msg: &ChatMessage,
    target: u64,
    name: &str,
    confirmation: String,
) -> HandlerResult {
    match register_name(&ctx.store, &target.to_string(), name).await {
        Ok(NameClaim::Taken) => {
            log::info!(
                "Set Name - Name {} already taken, refused for user {} in chat {}",
                name,
                target,
                msg.chat_id
            );
            notifier
                .reply(
                    msg.chat_id,
                    msg.message_id,
                    &format!(
                        "Nama '{}' sudah digunakan. Silakan pilih nama lain.",
                        html::escape(name)
                    ),
                )
                .await
        }
        Ok(claim) => {
            log::info!(
                "Set Name - Name set to {} for user {} in chat {}: {:?}",
                name,
                target,
                msg.chat_id,
                claim
            );
            notifier
                .reply(msg.chat_id, msg.message_id, &confirmation)
                .await
        }
        Err(err) => {
            log::error!(
                "Set Name - Processor failed to set name {} for user {} in chat {}: {}",
                name,
                target,
                msg.chat_id,
                err.to_string()
            );
            reply_process_error(notifier, msg, err).await
        }
    }
}

/* Set command.
 * Registers or changes the caller's own GrowID.
 */
pub async fn action_set<S: AccountStore, N: Notifier>(
    ctx: &BotContext<S>,
    notifier: &N,
    msg: &ChatMessage,
    author_id: u64,
    args: &[String],
) -> HandlerResult {
    if args.is_empty() {
        notifier
            .reply(
                msg.chat_id,
                msg.message_id,
                "Format perintah tidak valid. Gunakan: <code>set &lt;growid&gt;</code>",
            )
            .await?;
        return Ok(());
    }

    let name = args.join(" ");
    let confirmation = format!(
        "GrowID Anda telah diatur menjadi: {}",
        html::escape(&name)
    );
    assign_name(ctx, notifier, msg, author_id, &name, confirmation).await
}

/* Setuser command.
 * Owner only. Sets the GrowID of another user, given either as a numeric
 * user id in front of the name, or as the author of the replied-to message.
 */
pub async fn action_set_user<S: AccountStore, N: Notifier>(
    ctx: &BotContext<S>,
    notifier: &N,
    msg: &ChatMessage,
    author_id: u64,
    args: &[String],
) -> HandlerResult {
    if !ctx.settings.is_owner(author_id) {
        notifier
            .reply(msg.chat_id, msg.message_id, NO_PERMISSION_MESSAGE)
            .await?;
        return Ok(());
    }

    let target = match args.split_first() {
        Some((first, rest)) if !rest.is_empty() && parse_user_id(first).is_some() => {
            parse_user_id(first).map(|id| (id, rest.join(" ")))
        }
        Some(_) => msg.reply_to_author.map(|id| (id, args.join(" "))),
        None => None,
    };

    let (target, name) = match target {
        Some(target) => target,
        None if args.len() < 2 => {
            notifier
                .reply(
                    msg.chat_id,
                    msg.message_id,
                    "Format perintah tidak valid. Gunakan: <code>setuser &lt;user id&gt; &lt;growid&gt;</code>",
                )
                .await?;
            return Ok(());
        }
        None => {
            notifier
                .reply(
                    msg.chat_id,
                    msg.message_id,
                    "Pengguna tidak ditemukan. Silakan sebutkan pengguna yang valid.",
                )
                .await?;
            return Ok(());
        }
    };

    let confirmation = format!(
        "GrowID untuk {} telah diatur menjadi: {}",
        mention(target),
        html::escape(&name)
    );
    assign_name(ctx, notifier, msg, target, &name, confirmation).await
}

/* Bal command.
 * Displays the caller's balance and deposit totals.
 */
pub async fn action_balance<S: AccountStore, N: Notifier>(
    ctx: &BotContext<S>,
    notifier: &N,
    msg: &ChatMessage,
    author_id: u64,
) -> HandlerResult {
    let account = match retrieve_account(&ctx.store, &author_id.to_string()).await {
        Ok(account) => account,
        Err(err) => {
            log::error!(
                "View Balance - Processor failed to retrieve account for user {} in chat {}: {}",
                author_id,
                msg.chat_id,
                err.to_string()
            );
            return reply_process_error(notifier, msg, err).await;
        }
    };

    match account {
        None => {
            notifier
                .reply(
                    msg.chat_id,
                    msg.message_id,
                    &format!(
                        "Anda belum memiliki akun. Silakan gunakan perintah <code>{}set &lt;growid&gt;</code> terlebih dahulu.",
                        html::escape(&ctx.settings.prefix)
                    ),
                )
                .await
        }
        Some(account) => {
            let card = Card {
                title: "Saldo Anda".to_string(),
                description: format!(
                    "<b>GrowID:</b> {}\n<b>Saldo:</b> {} {WORLD_LOCK_EMOJI}\n<b>Total Deposit:</b> {}\n<b>Saldo Saweria:</b> Rp {}",
                    html::escape(&account.name),
                    format_amount(account.balance),
                    format_amount(account.balance_history),
                    format_amount(account.sawer)
                ),
                image_url: None,
            };
            notifier.reply_card(msg.chat_id, msg.message_id, &card).await
        }
    }
}
