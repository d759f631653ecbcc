//! Integration tests for passive activity statistics and the commands
//! built on them.

mod common;

use common::{CHANNEL, GUILD, TestBot, USER, direct_message, message_from};
use herald_platform::{ChannelId, ChannelKind, UserId};

#[tokio::test]
async fn test_words_accumulate_across_messages() {
    let tb = TestBot::spawn().await;

    tb.dispatch(&message_from(USER, "the server is back online"))
        .await;
    tb.dispatch(&message_from(USER, "everything looks healthy again"))
        .await;

    let total = tb
        .bot
        .db()
        .activity()
        .user_total(GUILD, USER)
        .await
        .expect("Failed to query activity");
    // "is" is too short to count.
    assert_eq!(total, 4 + 4);
}

#[tokio::test]
async fn test_direct_messages_record_nothing() {
    let tb = TestBot::spawn().await;

    tb.dispatch(&direct_message("hello there friends")).await;

    let total = tb
        .bot
        .db()
        .activity()
        .user_total(GUILD, USER)
        .await
        .expect("Failed to query activity");
    assert_eq!(total, 0);
}

#[tokio::test]
async fn test_tracking_off_stops_recording() {
    let tb = TestBot::spawn().await;
    let user = UserId(77);

    // The opt-out message itself is still recorded; the user was
    // trackable when it arrived.
    let body = tb
        .dispatch(&message_from(user, "!tracking off"))
        .await
        .expect("tracking change should answer");
    assert!(body.contains("no longer count"));

    let activity = || async {
        tb.bot
            .db()
            .activity()
            .user_total(GUILD, user)
            .await
            .expect("Failed to query activity")
    };
    assert_eq!(activity().await, 2);

    tb.dispatch(&message_from(user, "these words vanish without trace"))
        .await;
    assert_eq!(activity().await, 2);

    // Same edge on the way back: the opt-in message is not recorded.
    tb.dispatch(&message_from(user, "!tracking on"))
        .await
        .expect("tracking change should answer");
    assert_eq!(activity().await, 2);

    tb.dispatch(&message_from(user, "counted words once more"))
        .await;
    assert_eq!(activity().await, 2 + 4);
}

#[tokio::test]
async fn test_thread_messages_count_for_the_parent_channel() {
    let tb = TestBot::spawn().await;

    let mut event = message_from(USER, "deep inside some thread");
    event.channel_id = ChannelId(999);
    event.channel_kind = ChannelKind::Thread { parent_id: CHANNEL };
    tb.dispatch(&event).await;

    let total = tb
        .bot
        .db()
        .activity()
        .user_total(GUILD, USER)
        .await
        .expect("Failed to query activity");
    assert_eq!(total, 4);
}

#[tokio::test]
async fn test_activity_command_reports_board_and_rank() {
    let tb = TestBot::spawn().await;
    let quiet = UserId(301);

    tb.dispatch(&message_from(USER, "alpha bravo charlie delta echo"))
        .await;
    tb.dispatch(&message_from(quiet, "hello there everyone"))
        .await;

    // The invocation itself counts one more word for the caller.
    let body = tb
        .dispatch(&message_from(quiet, "!activity"))
        .await
        .expect("activity should answer");

    assert!(body.contains("1. <@300> - 5"));
    assert!(body.contains("2. <@301> - 4"));
    assert!(body.contains("You are rank 2 with 4 words."));
}

#[tokio::test]
async fn test_activity_without_history_says_so() {
    let tb = TestBot::spawn().await;
    let user = UserId(44);

    // Even the invocation itself would count a word, so opt out over DM
    // first; DMs never touch the statistics.
    let mut opt_out = direct_message("!tracking off");
    opt_out.author.id = user;
    tb.dispatch(&opt_out)
        .await
        .expect("tracking change should answer");

    let body = tb
        .dispatch(&message_from(user, "!rank"))
        .await
        .expect("activity should answer");
    assert_eq!(body, "No activity recorded for you yet.");
}
