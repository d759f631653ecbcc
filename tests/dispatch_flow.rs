//! Integration tests for the dispatch pipeline: prefix matching, name
//! lookup, validation, and error rendering.

mod common;

use common::{GUILD, TestBot, USER, direct_message, guild_message, message_from};
use herald_platform::{Author, ChannelId, ChannelKind, MessageEvent, MessageId, UserId};

#[tokio::test]
async fn test_ping_round_trip() {
    let tb = TestBot::spawn().await;

    let reply = tb.dispatch(&guild_message("!ping")).await;
    assert_eq!(reply.as_deref(), Some("Pong!"));
}

#[tokio::test]
async fn test_command_names_are_case_insensitive() {
    let tb = TestBot::spawn().await;

    assert_eq!(
        tb.dispatch(&guild_message("!PiNg")).await.as_deref(),
        Some("Pong!")
    );
}

#[tokio::test]
async fn test_aliases_resolve_to_the_same_command() {
    let tb = TestBot::spawn().await;

    let by_code = tb.dispatch(&guild_message("!help")).await;
    let by_alias = tb.dispatch(&guild_message("!commands")).await;
    assert_eq!(by_code, by_alias);
    assert!(by_code.is_some());
}

#[tokio::test]
async fn test_plain_messages_stay_silent_but_count() {
    let tb = TestBot::spawn().await;

    let reply = tb.dispatch(&guild_message("hello there friends")).await;
    assert_eq!(reply, None);

    let total = tb
        .bot
        .db()
        .activity()
        .user_total(GUILD, USER)
        .await
        .expect("Failed to query activity");
    assert_eq!(total, 3);
}

#[tokio::test]
async fn test_unknown_commands_stay_silent() {
    let tb = TestBot::spawn().await;

    // Another bot on the same prefix may own the name.
    assert_eq!(tb.dispatch(&guild_message("!frobnicate")).await, None);
    assert!(tb.outbound().is_empty());
}

#[tokio::test]
async fn test_messages_from_bots_are_ignored() {
    let tb = TestBot::spawn().await;

    let event = MessageEvent {
        id: MessageId(5),
        guild_id: Some(GUILD),
        channel_id: ChannelId(200),
        channel_kind: ChannelKind::GuildText,
        author: Author {
            id: UserId(555),
            name: "other-bot".to_string(),
            bot: true,
        },
        content: "!ping".to_string(),
        sent_at: chrono::Utc::now(),
    };
    assert_eq!(tb.dispatch(&event).await, None);

    // Not even resolved: no activity recorded for the bot account.
    let total = tb
        .bot
        .db()
        .activity()
        .user_total(GUILD, UserId(555))
        .await
        .expect("Failed to query activity");
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_help_lists_visible_commands_only() {
    let tb = TestBot::spawn().await;

    let body = tb
        .dispatch(&guild_message("!help"))
        .await
        .expect("help should answer");

    assert!(body.contains("!ping"));
    assert!(body.contains("!remind (reminder)"));
    assert!(body.contains("!prefix"));
    assert!(!body.contains("queue"));
}

#[tokio::test]
async fn test_ping_works_in_direct_messages() {
    let tb = TestBot::spawn().await;

    assert_eq!(
        tb.dispatch(&direct_message("!ping")).await.as_deref(),
        Some("Pong!")
    );
}

#[tokio::test]
async fn test_value_failure_renders_the_catalog_template() {
    let tb = TestBot::spawn().await;

    let body = tb
        .dispatch(&guild_message("!tracking maybe"))
        .await
        .expect("validation failure should answer");

    assert!(body.contains("\"maybe\" is not a valid value"));
    assert!(body.contains("on, off"));
}

#[tokio::test]
async fn test_count_failure_renders_the_catalog_template() {
    let tb = TestBot::spawn().await;

    let body = tb
        .dispatch(&guild_message("!remind 10m"))
        .await
        .expect("validation failure should answer");

    assert!(body.contains("at least 2"));
    assert!(body.contains("you passed 1"));
}

#[tokio::test]
async fn test_denied_command_does_not_run() {
    let tb = TestBot::spawn().await;

    // No MANAGE_GUILD grant, so the prefix never changes.
    let body = tb
        .dispatch(&message_from(USER, "!prefix ?"))
        .await
        .expect("denial should answer");
    assert!(body.contains("MANAGE_GUILD"));

    assert_eq!(tb.dispatch(&guild_message("?ping")).await, None);
    assert_eq!(
        tb.dispatch(&guild_message("!ping")).await.as_deref(),
        Some("Pong!")
    );
}
