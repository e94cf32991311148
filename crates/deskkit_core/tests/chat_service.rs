use chrono::{Duration, TimeZone, Utc};
use deskkit_core::model::chat::Role;
use deskkit_core::service::chat_service::{
    CannedResponder, ChatError, ChatService, ReplyDelay, Responder,
};
use deskkit_core::{Clock, DocumentStore, ManualClock, MemoryBackend, DEFAULT_STORAGE_KEY};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn store() -> (DocumentStore, ManualClock) {
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap());
    let store = DocumentStore::open(
        Box::new(MemoryBackend::new()),
        Box::new(clock.clone()),
        DEFAULT_STORAGE_KEY,
    );
    (store, clock)
}

fn responder() -> CannedResponder<StdRng> {
    CannedResponder::new(StdRng::seed_from_u64(7))
}

/// Echoes the prompt so tests can pair replies with messages.
struct Echo;

impl Responder for Echo {
    fn respond(&mut self, prompt: &str) -> String {
        format!("re: {prompt}")
    }
}

#[test]
fn reply_arrives_only_after_delay() {
    let (store, clock) = store();
    let mut chat = ChatService::new(&store, responder(), ReplyDelay::default());
    let session = chat.open_or_create().into_value();

    let receipt = chat.send(&session.id, "hello").unwrap().into_value();
    assert!(receipt.reply_due_at >= clock.now() + Duration::seconds(1));
    assert!(receipt.reply_due_at <= clock.now() + Duration::seconds(3));
    assert!(chat.poll_replies().is_empty());

    clock.advance(Duration::seconds(3));
    let replies = chat.poll_replies();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].value.role, Role::Assistant);
    assert!(!chat.has_pending(&session.id));
    assert!(chat.poll_replies().is_empty());
}

#[test]
fn second_send_is_rejected_while_reply_pending() {
    let (store, _) = store();
    let mut chat = ChatService::new(&store, responder(), ReplyDelay::default());
    let session = chat.open_or_create().into_value();

    chat.send(&session.id, "first").unwrap().into_value();
    let err = chat.send(&session.id, "second").unwrap_err();
    assert!(matches!(err, ChatError::ReplyPending(id) if id == session.id));

    let stored = chat.repository().get_session(&session.id).unwrap();
    assert_eq!(stored.messages.len(), 1);
}

#[test]
fn every_message_gets_exactly_one_reply_in_order() {
    let (store, _) = store();
    let mut chat = ChatService::new(&store, Echo, ReplyDelay::immediate());
    let session = chat.open_or_create().into_value();

    for text in ["one", "two", "three"] {
        chat.send(&session.id, text).unwrap().into_value();
        assert_eq!(chat.poll_replies().len(), 1);
    }

    let messages = chat.repository().get_session(&session.id).unwrap().messages;
    let transcript = messages
        .iter()
        .map(|message| (message.role, message.content.as_str()))
        .collect::<Vec<_>>();
    assert_eq!(
        transcript,
        [
            (Role::User, "one"),
            (Role::Assistant, "re: one"),
            (Role::User, "two"),
            (Role::Assistant, "re: two"),
            (Role::User, "three"),
            (Role::Assistant, "re: three"),
        ]
    );
    assert!(messages
        .windows(2)
        .all(|pair| pair[0].timestamp <= pair[1].timestamp));
}

#[test]
fn keyword_prompts_get_fixed_replies() {
    let (store, _) = store();
    let mut chat = ChatService::new(&store, responder(), ReplyDelay::immediate());
    let session = chat.open_or_create().into_value();

    chat.send(&session.id, "thanks a lot").unwrap().into_value();
    let first = chat.poll_replies().remove(0).into_value();
    chat.send(&session.id, "thank you").unwrap().into_value();
    let second = chat.poll_replies().remove(0).into_value();
    assert_eq!(first.content, second.content);
}

#[test]
fn blank_and_stale_sends_are_rejected() {
    let (store, _) = store();
    let mut chat = ChatService::new(&store, Echo, ReplyDelay::immediate());
    let session = chat.open_or_create().into_value();

    assert!(matches!(
        chat.send(&session.id, "   "),
        Err(ChatError::Validation(_))
    ));
    assert!(matches!(
        chat.send("missing", "hi"),
        Err(ChatError::SessionNotFound(_))
    ));
    assert!(!chat.has_pending("missing"));
}

#[test]
fn reply_for_deleted_session_is_dropped() {
    let (store, _) = store();
    let mut chat = ChatService::new(&store, Echo, ReplyDelay::immediate());
    let session = chat.open_or_create().into_value();

    chat.send(&session.id, "hi").unwrap().into_value();
    assert!(chat.repository().delete_session(&session.id).into_value());
    assert!(chat.poll_replies().is_empty());
    assert!(chat.repository().list_sessions().is_empty());
}

#[test]
fn open_or_create_reuses_latest_session() {
    let (store, _) = store();
    let chat = ChatService::new(&store, Echo, ReplyDelay::immediate());
    let first = chat.open_or_create().into_value();
    let again = chat.open_or_create().into_value();
    assert_eq!(first.id, again.id);

    let newer = chat.repository().create_session().into_value();
    assert_eq!(chat.open_or_create().into_value().id, newer.id);
}
