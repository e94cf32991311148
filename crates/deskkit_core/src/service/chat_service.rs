//! Mock assistant chat with delayed, keyword-driven replies.
//!
//! # Responsibility
//! - Append user messages and schedule exactly one assistant reply for each.
//! - Enforce a single in-flight reply per session.
//!
//! # Invariants
//! - Replies are appended in the order their prompts were sent.
//! - A pending reply cannot be cancelled; it is appended by the first
//!   `poll_replies` call at or after its due time.
//! - The responder never sees or logs anything outside the prompt text.

use crate::model::chat::{ChatSession, Message, Role};
use crate::model::id::EntityId;
use crate::model::validation::{normalize_required, ValidationError};
use crate::repo::chat_repo::ChatRepository;
use crate::store::{DocumentStore, Saved};
use chrono::{DateTime, Duration, Utc};
use log::{info, warn};
use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

static GREETING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(hello|hi|hey)\b|你好|您好").expect("valid greeting regex")
});
static THANKS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bthank|谢谢|感谢").expect("valid thanks regex")
});
static FAREWELL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(bye|goodbye)\b|再见|拜拜").expect("valid farewell regex")
});

const GREETING_REPLY: &str = "Hello! Glad to help. What can I do for you?";
const THANKS_REPLY: &str = "You're welcome! Ask me anything else whenever you like.";
const FAREWELL_REPLY: &str = "Goodbye! Have a great day, and come back any time.";

const CANNED_REPLIES: [&str; 5] = [
    "That's a good question. I'd suggest looking at it from a few angles...",
    "From what you describe, here is how I understand it. Let me explain in detail.",
    "Thanks for asking, it's an interesting topic. Based on what I know...",
    "Happy to help with that. Given the information you shared, my suggestion is...",
    "This comes up often and it matters. Let me walk through some possible solutions...",
];

/// Produces assistant replies for user prompts.
pub trait Responder {
    fn respond(&mut self, prompt: &str) -> String;
}

/// Keyword-matched replies with a random canned fallback.
pub struct CannedResponder<R: Rng> {
    rng: R,
}

impl<R: Rng> CannedResponder<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl CannedResponder<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl<R: Rng> Responder for CannedResponder<R> {
    fn respond(&mut self, prompt: &str) -> String {
        if let Some(reply) = keyword_reply(prompt) {
            return reply.to_string();
        }
        let index = self.rng.gen_range(0..CANNED_REPLIES.len());
        CANNED_REPLIES[index].to_string()
    }
}

/// Returns the fixed reply for greetings, thanks and farewells.
///
/// Checked in that order, so "hi, thanks" is treated as a greeting.
pub fn keyword_reply(prompt: &str) -> Option<&'static str> {
    if GREETING_RE.is_match(prompt) {
        Some(GREETING_REPLY)
    } else if THANKS_RE.is_match(prompt) {
        Some(THANKS_REPLY)
    } else if FAREWELL_RE.is_match(prompt) {
        Some(FAREWELL_REPLY)
    } else {
        None
    }
}

/// Simulated response latency: `min` plus a uniform jitter in `[0, jitter]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyDelay {
    pub min_ms: u64,
    pub jitter_ms: u64,
}

impl Default for ReplyDelay {
    fn default() -> Self {
        Self {
            min_ms: 1000,
            jitter_ms: 2000,
        }
    }
}

impl ReplyDelay {
    /// Upper bound for each of `min_ms` and `jitter_ms`.
    pub const MAX_MS: u64 = 60_000;

    pub fn immediate() -> Self {
        Self {
            min_ms: 0,
            jitter_ms: 0,
        }
    }

    fn sample(&self, rng: &mut impl Rng) -> Duration {
        let min_ms = self.min_ms.min(Self::MAX_MS);
        let jitter_ms = self.jitter_ms.min(Self::MAX_MS);
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rng.gen_range(0..=jitter_ms)
        };
        let total = i64::try_from(min_ms + jitter).unwrap_or(0);
        Duration::try_milliseconds(total).unwrap_or_else(Duration::zero)
    }

    /// Instant at which a reply sent at `now` becomes due.
    ///
    /// Falls back to `now` when the sum leaves the representable range.
    pub fn due_at(&self, now: DateTime<Utc>, rng: &mut impl Rng) -> DateTime<Utc> {
        now.checked_add_signed(self.sample(rng)).unwrap_or(now)
    }
}

#[derive(Debug)]
pub enum ChatError {
    Validation(ValidationError),
    /// A reply for this session is still in flight.
    ReplyPending(EntityId),
    SessionNotFound(EntityId),
}

impl Display for ChatError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ReplyPending(id) => write!(f, "a reply is still pending for session {id}"),
            Self::SessionNotFound(id) => write!(f, "chat session not found: {id}"),
        }
    }
}

impl Error for ChatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for ChatError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Acknowledgement of an accepted user message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendReceipt {
    pub user_message: Message,
    /// Earliest instant at which `poll_replies` appends the answer.
    pub reply_due_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct PendingReply {
    session_id: EntityId,
    prompt: String,
    due_at: DateTime<Utc>,
}

pub struct ChatService<'s, R: Responder> {
    store: &'s DocumentStore,
    chats: ChatRepository<'s>,
    responder: R,
    delay: ReplyDelay,
    delay_rng: StdRng,
    pending: Vec<PendingReply>,
}

impl<'s, R: Responder> ChatService<'s, R> {
    pub fn new(store: &'s DocumentStore, responder: R, delay: ReplyDelay) -> Self {
        Self {
            store,
            chats: ChatRepository::new(store),
            responder,
            delay,
            delay_rng: StdRng::from_entropy(),
            pending: Vec::new(),
        }
    }

    pub fn repository(&self) -> &ChatRepository<'s> {
        &self.chats
    }

    /// Returns the latest session, creating one when there is none.
    pub fn open_or_create(&self) -> Saved<ChatSession> {
        match self.chats.latest_session() {
            Some(session) => Saved::persisted(session),
            None => self.chats.create_session(),
        }
    }

    /// Appends a user message and schedules its reply.
    ///
    /// # Errors
    /// - `Validation` when `text` is blank.
    /// - `ReplyPending` when the session already waits for a reply.
    /// - `SessionNotFound` when the session id is stale.
    pub fn send(&mut self, session_id: &str, text: &str) -> Result<Saved<SendReceipt>, ChatError> {
        let text = normalize_required("message", text)?;
        if self.has_pending(session_id) {
            return Err(ChatError::ReplyPending(session_id.to_string()));
        }

        let reply_due_at = self.delay.due_at(self.store.now(), &mut self.delay_rng);
        let Some(saved) = self
            .chats
            .append_message(session_id, Role::User, &text)
            .transpose()
        else {
            return Err(ChatError::SessionNotFound(session_id.to_string()));
        };

        self.pending.push(PendingReply {
            session_id: session_id.to_string(),
            prompt: text,
            due_at: reply_due_at,
        });
        info!(
            "event=chat_send module=chat status=ok session_id={session_id} pending={}",
            self.pending.len()
        );

        Ok(saved.map(|user_message| SendReceipt {
            user_message,
            reply_due_at,
        }))
    }

    pub fn has_pending(&self, session_id: &str) -> bool {
        self.pending
            .iter()
            .any(|pending| pending.session_id == session_id)
    }

    /// Earliest due time among pending replies.
    pub fn next_due_at(&self) -> Option<DateTime<Utc>> {
        self.pending.iter().map(|pending| pending.due_at).min()
    }

    /// Appends every reply whose due time has passed.
    ///
    /// Returns the appended assistant messages in send order.
    pub fn poll_replies(&mut self) -> Vec<Saved<Message>> {
        let now = self.store.now();
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|pending| pending.due_at <= now);
        self.pending = waiting;

        let mut delivered = Vec::with_capacity(due.len());
        for pending in due {
            let reply = self.responder.respond(&pending.prompt);
            match self
                .chats
                .append_message(&pending.session_id, Role::Assistant, &reply)
                .transpose()
            {
                Some(saved) => delivered.push(saved),
                None => warn!(
                    "event=chat_reply module=chat status=skip session_id={} reason=session_deleted",
                    pending.session_id
                ),
            }
        }
        delivered
    }
}

#[cfg(test)]
mod tests {
    use super::{keyword_reply, CannedResponder, ReplyDelay, Responder, CANNED_REPLIES};
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn keywords_match_whole_words_only() {
        assert!(keyword_reply("Hi there").is_some());
        assert!(keyword_reply("您好，请问").is_some());
        assert!(keyword_reply("this is a history question").is_none());
        assert_eq!(
            keyword_reply("thank you so much"),
            keyword_reply("谢谢")
        );
        assert_eq!(keyword_reply("bye for now"), keyword_reply("拜拜"));
    }

    #[test]
    fn fallback_reply_is_one_of_the_canned_strings() {
        let mut responder = CannedResponder::new(StdRng::seed_from_u64(7));
        for _ in 0..20 {
            let reply = responder.respond("explain borrow checking");
            assert!(CANNED_REPLIES.contains(&reply.as_str()));
        }
    }

    #[test]
    fn oversized_delay_is_capped_instead_of_overflowing() {
        let now = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
        let delay = ReplyDelay {
            min_ms: u64::MAX,
            jitter_ms: u64::MAX,
        };
        let mut rng = StdRng::seed_from_u64(1);
        let due = delay.due_at(now, &mut rng);
        assert!(due >= now + Duration::milliseconds(60_000));
        assert!(due <= now + Duration::milliseconds(120_000));
    }

    #[test]
    fn due_time_near_the_end_of_time_falls_back_to_now() {
        let mut rng = StdRng::seed_from_u64(1);
        let due = ReplyDelay::default().due_at(DateTime::<Utc>::MAX_UTC, &mut rng);
        assert_eq!(due, DateTime::<Utc>::MAX_UTC);
    }
}
