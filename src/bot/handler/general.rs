use teloxide::utils::html;

use crate::bot::{
    command::Command,
    dispatcher::{BotContext, HandlerResult},
    message::{Card, ChatMessage, Notifier},
};

use super::constants::NO_PERMISSION_MESSAGE;

/* Help command.
 * Displays a list of commands available to the user.
 * Owners also see the owner-only commands.
 */
pub async fn action_help<S, N: Notifier>(
    ctx: &BotContext<S>,
    notifier: &N,
    msg: &ChatMessage,
    author_id: u64,
) -> HandlerResult {
    let prefix = html::escape(&ctx.settings.prefix);
    let mut commands = vec![
        format!("{prefix}help - Menampilkan daftar perintah."),
        format!("{prefix}set &lt;growid&gt; - Mengatur GrowID Anda."),
        format!("{prefix}bal - Menampilkan saldo Anda."),
        format!("{prefix}depo - Menampilkan informasi deposit."),
        format!("{prefix}info [user] - Menampilkan informasi pengguna."),
        format!("{prefix}stock - Menampilkan daftar produk yang tersedia."),
        format!("{prefix}buy &lt;code product&gt; &lt;amount&gt; - Membeli produk."),
    ];

    if ctx.settings.is_owner(author_id) {
        commands.extend([
            format!("{prefix}setmt - Mengatur mode pemeliharaan."),
            format!("{prefix}addbal &lt;user&gt; &lt;total balance&gt; - Menambahkan saldo ke pengguna."),
            format!("{prefix}setuser &lt;user id&gt; &lt;growid&gt; - Mengatur GrowID untuk pengguna tertentu."),
            format!("{prefix}send &lt;user&gt; &lt;code&gt; &lt;amount&gt; - Mengirim produk ke pengguna."),
        ]);
    }

    let card = Card {
        title: "Daftar Perintah".to_string(),
        description: commands.join("\n"),
        image_url: ctx.settings.store_banner.clone(),
    };
    notifier.reply_card(msg.chat_id, msg.message_id, &card).await?;
    Ok(())
}

/* Maintenance command.
 * Owner only. Flips the maintenance flag of this bot instance.
 */
pub async fn action_maintenance<S, N: Notifier>(
    ctx: &BotContext<S>,
    notifier: &N,
    msg: &ChatMessage,
    author_id: u64,
) -> HandlerResult {
    if !ctx.settings.is_owner(author_id) {
        notifier
            .reply(msg.chat_id, msg.message_id, NO_PERMISSION_MESSAGE)
            .await?;
        return Ok(());
    }

    let enabled = ctx.toggle_maintenance();
    log::info!(
        "Maintenance - Set to {} by user {} in chat {}",
        enabled,
        author_id,
        msg.chat_id
    );

    let text = if enabled {
        "Mode pemeliharaan diaktifkan."
    } else {
        "Mode pemeliharaan dinonaktifkan."
    };
    notifier.reply(msg.chat_id, msg.message_id, text).await?;
    Ok(())
}

/* Commands that are recognised but have no behaviour yet.
 * Currently, simply does not respond to anything.
 */
pub fn action_unimplemented(command: Command, msg: &ChatMessage, author_id: u64) -> HandlerResult {
    log::debug!(
        "{} - Not implemented, ignored for user {} in chat {}",
        command.name(),
        author_id,
        msg.chat_id
    );
    Ok(())
}
