use teloxide::utils::html;

use crate::bot::{
    deposit::{parse_deposit_notice, DepositNotice},
    dispatcher::{BotContext, HandlerResult},
    message::{ChatMessage, Notifier},
    processor::credit_deposit,
    store::{Account, AccountStore},
};

use super::{
    constants::{USER_NOT_FOUND_MESSAGE, WORLD_LOCK_EMOJI},
    utils::format_amount,
};

// Text sent to both the account owner and the donation channel after a credit.
fn receipt(notice: &DepositNotice, account: &Account) -> String {
    match notice {
        DepositNotice::Lock { name, amount, unit } => format!(
            "Success Adding <b>{} {}</b> to <b>{}</b>\nNow Your Balance is <b>{}</b> {WORLD_LOCK_EMOJI}",
            amount,
            unit.label(),
            html::escape(name),
            format_amount(account.balance)
        ),
        DepositNotice::Saweria { name, amount } => format!(
            "Berhasil TopUp <b>Rp {}</b>\nSekarang Saldo {} ada <b>Rp {}</b>",
            format_amount(*amount),
            html::escape(name),
            format_amount(account.sawer)
        ),
    }
}

/* Deposit ingestion.
 * Invoked for automated posts in the donation channel.
 * A post that is not a deposit notice is ignored without a reply.
 */
pub async fn action_deposit<S: AccountStore, N: Notifier>(
    ctx: &BotContext<S>,
    notifier: &N,
    msg: &ChatMessage,
) -> HandlerResult {
    let notice = match parse_deposit_notice(&msg.embeds) {
        Some(notice) => notice,
        None => {
            log::debug!("Deposit - Ignored unrelated post in chat {}", msg.chat_id);
            return Ok(());
        }
    };

    let account = match credit_deposit(&ctx.store, &notice).await? {
        Some(account) => account,
        None => {
            log::info!(
                "Deposit - No account named {} for notice in chat {}: {:?}",
                notice.name(),
                msg.chat_id,
                notice
            );
            notifier
                .send_channel(msg.chat_id, USER_NOT_FOUND_MESSAGE)
                .await?;
            return Ok(());
        }
    };

    log::info!(
        "Deposit - Credited user {} in chat {}: {:?}",
        account.user,
        msg.chat_id,
        notice
    );

    let text = receipt(&notice, &account);
    match account.user.parse::<u64>() {
        Ok(user_id) => {
            // The credit stands even if the owner cannot be messaged
            if let Err(err) = notifier.send_direct(user_id, &text).await {
                log::error!(
                    "Deposit - Failed to notify user {} of deposit: {}",
                    user_id,
                    err.to_string()
                );
            }
        }
        Err(_) => log::error!(
            "Deposit - Account {} has no valid user id to notify",
            account.user
        ),
    }

    notifier.send_channel(msg.chat_id, &text).await?;
    Ok(())
}
