use std::future::Future;

use teloxide::{
    prelude::*,
    types::{MessageId, ParseMode},
    utils::html,
};

use super::dispatcher::BotError;

/* Platform-neutral view of an incoming message, and the outgoing side.
 * Handlers only see ChatMessage and talk back through a Notifier,
 * the Telegram specifics stay in this module.
 */

// A block of embedded content. Telegram has no embeds, a message maps to one
// block whose title is its first line and whose description is the whole text.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct Embed {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ChatMessage {
    pub chat_id: i64,
    pub message_id: i32,
    pub author_id: Option<u64>,
    pub author_is_bot: bool,
    // Posted by a bot account, or by the chat itself (channel post, anonymous admin).
    // Inline-bot messages and posts sent as some other channel are typed by a
    // person and do not count.
    pub automated: bool,
    pub text: String,
    pub embeds: Vec<Embed>,
    pub reply_to_author: Option<u64>,
}

impl ChatMessage {
    pub fn from_telegram(msg: &Message) -> ChatMessage {
        let author = msg.from();
        let author_is_bot = author.map(|user| user.is_bot).unwrap_or(false);
        let automated = match msg.sender_chat() {
            Some(sender) => sender.id == msg.chat.id,
            None => author.map_or(msg.chat.is_channel(), |user| user.is_bot),
        };

        let text = msg.text().or_else(|| msg.caption()).unwrap_or("").to_string();
        let embeds = if text.is_empty() {
            Vec::new()
        } else {
            vec![Embed {
                title: text.lines().next().map(str::to_string),
                description: Some(text.clone()),
            }]
        };

        ChatMessage {
            chat_id: msg.chat.id.0,
            message_id: msg.id.0,
            author_id: author.map(|user| user.id.0),
            author_is_bot,
            automated,
            text,
            embeds,
            reply_to_author: msg
                .reply_to_message()
                .and_then(|reply| reply.from())
                .map(|user| user.id.0),
        }
    }
}

// A titled block of text, the closest thing Telegram has to a rich embed.
#[derive(Debug, PartialEq, Clone)]
pub struct Card {
    pub title: String,
    // Already HTML-escaped.
    pub description: String,
    pub image_url: Option<String>,
}

impl Card {
    pub fn render(&self) -> String {
        let mut text = format!(
            "{}\n\n{}",
            html::bold(&html::escape(&self.title)),
            self.description
        );
        if let Some(url) = &self.image_url {
            text.push_str(&format!("\n\n{}", html::escape(url)));
        }
        text
    }
}

/* Outgoing messages. All texts are HTML. */
pub trait Notifier: Sync {
    fn send_direct(
        &self,
        user_id: u64,
        text: &str,
    ) -> impl Future<Output = Result<(), BotError>> + Send;

    fn send_channel(
        &self,
        chat_id: i64,
        text: &str,
    ) -> impl Future<Output = Result<(), BotError>> + Send;

    fn reply(
        &self,
        chat_id: i64,
        message_id: i32,
        text: &str,
    ) -> impl Future<Output = Result<(), BotError>> + Send;

    fn reply_card(
        &self,
        chat_id: i64,
        message_id: i32,
        card: &Card,
    ) -> impl Future<Output = Result<(), BotError>> + Send {
        async move {
            let text = card.render();
            self.reply(chat_id, message_id, &text).await
        }
    }
}

impl Notifier for Bot {
    async fn send_direct(&self, user_id: u64, text: &str) -> Result<(), BotError> {
        // Private chats share the user's id
        self.send_message(ChatId(user_id as i64), text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn send_channel(&self, chat_id: i64, text: &str) -> Result<(), BotError> {
        self.send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html)
            .await?;
        Ok(())
    }

    async fn reply(&self, chat_id: i64, message_id: i32, text: &str) -> Result<(), BotError> {
        self.send_message(ChatId(chat_id), text)
            .parse_mode(ParseMode::Html)
            .reply_to_message_id(MessageId(message_id))
            .await?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use super::*;
    use crate::bot::{
        dispatcher::{handle_message, BotContext, BotSettings},
        message::mock::RecordingNotifier,
        store::{memory::MemoryStore, Account, AccountStore},
    };

    const DONATIONS: i64 = -1002;
    const DEPOSIT_TEXT: &str = "GrowID: bob\nDeposit: 50 Diamond Lock";

    fn group_message(extra: Value) -> Message {
        let mut message = json!({
            "message_id": 7,
            "date": 1700000000,
            "chat": { "id": DONATIONS, "type": "supergroup", "title": "Donations" },
            "text": DEPOSIT_TEXT
        });
        for (key, value) in extra.as_object().unwrap() {
            message[key] = value.clone();
        }
        serde_json::from_value(message).unwrap()
    }

    fn member() -> Value {
        json!({ "id": 999, "is_bot": false, "first_name": "Member" })
    }

    #[test]
    fn test_plain_user_message() {
        let msg = ChatMessage::from_telegram(&group_message(json!({ "from": member() })));
        assert_eq!(msg.chat_id, DONATIONS);
        assert_eq!(msg.message_id, 7);
        assert_eq!(msg.author_id, Some(999));
        assert!(!msg.author_is_bot);
        assert!(!msg.automated);
        assert_eq!(
            msg.embeds,
            vec![Embed {
                title: Some("GrowID: bob".to_string()),
                description: Some(DEPOSIT_TEXT.to_string()),
            }]
        );
    }

    #[test]
    fn test_via_bot_message_is_not_automated() {
        let msg = ChatMessage::from_telegram(&group_message(json!({
            "from": member(),
            "via_bot": { "id": 555, "is_bot": true, "first_name": "Echo", "username": "echobot" }
        })));
        assert_eq!(msg.author_id, Some(999));
        assert!(!msg.author_is_bot);
        assert!(!msg.automated);
    }

    #[test]
    fn test_bot_author_is_automated() {
        let msg = ChatMessage::from_telegram(&group_message(json!({
            "from": {
                "id": 777,
                "is_bot": true,
                "first_name": "Deposits",
                "username": "depositbot"
            }
        })));
        assert_eq!(msg.author_id, Some(777));
        assert!(msg.author_is_bot);
        assert!(msg.automated);
    }

    #[test]
    fn test_channel_post_is_automated() {
        let channel = json!({ "id": -1003, "type": "channel", "title": "Deposits" });
        let post: Message = serde_json::from_value(json!({
            "message_id": 8,
            "date": 1700000000,
            "chat": channel,
            "sender_chat": channel,
            "text": DEPOSIT_TEXT
        }))
        .unwrap();
        let msg = ChatMessage::from_telegram(&post);
        assert_eq!(msg.author_id, None);
        assert!(!msg.author_is_bot);
        assert!(msg.automated);
    }

    #[test]
    fn test_post_as_other_channel_is_not_automated() {
        let msg = ChatMessage::from_telegram(&group_message(json!({
            "from": {
                "id": 136817688,
                "is_bot": true,
                "first_name": "Channel",
                "username": "Channel_Bot"
            },
            "sender_chat": { "id": -1009, "type": "channel", "title": "Member's channel" }
        })));
        assert!(!msg.automated);
    }

    #[tokio::test]
    async fn test_via_bot_deposit_is_not_credited() {
        let ctx = BotContext::new(
            BotSettings {
                prefix: "!".to_string(),
                donation_channel: Some(DONATIONS),
                ..Default::default()
            },
            MemoryStore::new(),
        );
        ctx.store.insert(Account::new("5", "bob"));
        let notifier = RecordingNotifier::new();

        let msg = ChatMessage::from_telegram(&group_message(json!({
            "from": member(),
            "via_bot": { "id": 555, "is_bot": true, "first_name": "Echo", "username": "echobot" }
        })));
        handle_message(&ctx, &notifier, msg).await.unwrap();

        let bob = ctx.store.find_by_user("5").await.unwrap().unwrap();
        assert_eq!(bob.balance, 0);
        assert!(notifier.sent().is_empty());
    }

    #[test]
    fn test_card_render() {
        let card = Card {
            title: "Saldo Anda".to_string(),
            description: "<b>Saldo:</b> 500".to_string(),
            image_url: Some("https://example.com/banner.png?a=1&b=2".to_string()),
        };
        assert_eq!(
            card.render(),
            "<b>Saldo Anda</b>\n\n<b>Saldo:</b> 500\n\nhttps://example.com/banner.png?a=1&amp;b=2"
        );
    }

    #[test]
    fn test_card_render_without_image() {
        let card = Card {
            title: "A & B".to_string(),
            description: "text".to_string(),
            image_url: None,
        };
        assert_eq!(card.render(), "<b>A &amp; B</b>\n\ntext");
    }
}
