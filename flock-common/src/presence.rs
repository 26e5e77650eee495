//! Best-effort tracking of connected accounts and typing indicators.
//!
//! The tracker is fed by whatever transport hosts it (the server announces
//! on authenticated requests, a realtime layer could announce on channel
//! joins) and never talks to the network itself. Every announced state
//! carries a local TTL; a client that vanishes without a leave simply stays
//! visible until its deadline passes. Interested parties subscribe to a
//! `flume` channel and receive join/leave/typing events as they happen.

use chrono::{DateTime, Duration, Utc};
use flume::{Receiver, Sender};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

/// How long an announcement keeps an account "online".
pub const PRESENCE_TTL_SECONDS: i64 = 90;
/// Typing indicators re-announce "not typing" after this long.
pub const TYPING_TTL_SECONDS: i64 = 2;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum PresenceEvent {
    Join(i32),
    Leave(i32),
    Typing {
        sender_id: i32,
        receiver_id: i32,
        active: bool,
    },
}

struct Inner {
    online: HashMap<i32, DateTime<Utc>>,
    typing: HashMap<(i32, i32), DateTime<Utc>>,
    subscribers: Vec<Sender<PresenceEvent>>,
}

pub struct PresenceTracker {
    inner: Mutex<Inner>,
}

impl Default for PresenceTracker {
    fn default() -> Self {
        PresenceTracker {
            inner: Mutex::new(Inner {
                online: HashMap::new(),
                typing: HashMap::new(),
                subscribers: Vec::new(),
            }),
        }
    }
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a channel on which future presence events will be delivered.
    pub fn subscribe(&self) -> Receiver<PresenceEvent> {
        let (tx, rx) = flume::unbounded();
        self.inner.lock().unwrap().subscribers.push(tx);
        rx
    }

    /// Records that `user_id` is connected, extending its deadline.
    pub fn announce(&self, user_id: i32, now: DateTime<Utc>) {
        let mut inner = self.inner.lock().unwrap();
        let deadline = now + Duration::seconds(PRESENCE_TTL_SECONDS);
        if inner.online.insert(user_id, deadline).is_none() {
            debug!("user {} came online", user_id);
            broadcast(&mut inner, PresenceEvent::Join(user_id));
        }
    }

    /// Explicit disconnect. Also clears any typing state the account held.
    pub fn depart(&self, user_id: i32, _now: DateTime<Utc>) {
        let mut inner = self.inner.lock().unwrap();
        if inner.online.remove(&user_id).is_some() {
            broadcast(&mut inner, PresenceEvent::Leave(user_id));
        }
        let stale: Vec<(i32, i32)> = inner
            .typing
            .keys()
            .filter(|(from, _)| *from == user_id)
            .cloned()
            .collect();
        for key in stale {
            inner.typing.remove(&key);
            broadcast(
                &mut inner,
                PresenceEvent::Typing {
                    sender_id: key.0,
                    receiver_id: key.1,
                    active: false,
                },
            );
        }
    }

    /// The set of currently-online account ids, sorted for stable output.
    pub fn online(&self, now: DateTime<Utc>) -> Vec<i32> {
        let mut inner = self.inner.lock().unwrap();
        purge(&mut inner, now);
        let mut ids: Vec<i32> = inner.online.keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    pub fn is_online(&self, user_id: i32, now: DateTime<Utc>) -> bool {
        let mut inner = self.inner.lock().unwrap();
        purge(&mut inner, now);
        inner.online.contains_key(&user_id)
    }

    /// Marks `sender_id` as composing a message to `receiver_id`.
    pub fn set_typing(&self, sender_id: i32, receiver_id: i32, now: DateTime<Utc>) {
        let mut inner = self.inner.lock().unwrap();
        let deadline = now + Duration::seconds(TYPING_TTL_SECONDS);
        if inner
            .typing
            .insert((sender_id, receiver_id), deadline)
            .is_none()
        {
            broadcast(
                &mut inner,
                PresenceEvent::Typing {
                    sender_id,
                    receiver_id,
                    active: true,
                },
            );
        }
    }

    /// Accounts currently composing a message to `receiver_id`.
    pub fn typing_to(&self, receiver_id: i32, now: DateTime<Utc>) -> Vec<i32> {
        let mut inner = self.inner.lock().unwrap();
        purge(&mut inner, now);
        let mut ids: Vec<i32> = inner
            .typing
            .keys()
            .filter(|(_, to)| *to == receiver_id)
            .map(|(from, _)| *from)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Drops expired entries and emits the matching leave/not-typing events.
    /// Meant to be called periodically by the host.
    pub fn sweep(&self, now: DateTime<Utc>) {
        let mut inner = self.inner.lock().unwrap();
        purge(&mut inner, now);
    }
}

fn purge(inner: &mut Inner, now: DateTime<Utc>) {
    let gone: Vec<i32> = inner
        .online
        .iter()
        .filter(|(_, deadline)| **deadline <= now)
        .map(|(id, _)| *id)
        .collect();
    for id in gone {
        inner.online.remove(&id);
        debug!("user {} timed out", id);
        broadcast(inner, PresenceEvent::Leave(id));
    }

    let stopped: Vec<(i32, i32)> = inner
        .typing
        .iter()
        .filter(|(_, deadline)| **deadline <= now)
        .map(|(key, _)| *key)
        .collect();
    for key in stopped {
        inner.typing.remove(&key);
        broadcast(
            inner,
            PresenceEvent::Typing {
                sender_id: key.0,
                receiver_id: key.1,
                active: false,
            },
        );
    }
}

fn broadcast(inner: &mut Inner, event: PresenceEvent) {
    inner
        .subscribers
        .retain(|sub| sub.send(event.clone()).is_ok());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn announce_and_expire() {
        let tracker = PresenceTracker::new();
        let t0 = now();
        tracker.announce(7, t0);
        tracker.announce(3, t0);
        assert_eq!(tracker.online(t0), vec![3, 7]);
        assert!(tracker.is_online(7, t0));

        let later = t0 + Duration::seconds(PRESENCE_TTL_SECONDS + 1);
        assert_eq!(tracker.online(later), Vec::<i32>::new());
        assert!(!tracker.is_online(7, later));
    }

    #[test]
    fn reannounce_extends_deadline() {
        let tracker = PresenceTracker::new();
        let t0 = now();
        tracker.announce(1, t0);
        let mid = t0 + Duration::seconds(PRESENCE_TTL_SECONDS - 5);
        tracker.announce(1, mid);
        let past_first = t0 + Duration::seconds(PRESENCE_TTL_SECONDS + 1);
        assert!(tracker.is_online(1, past_first));
    }

    #[test]
    fn typing_expires_after_two_seconds() {
        let tracker = PresenceTracker::new();
        let t0 = now();
        tracker.set_typing(1, 2, t0);
        assert_eq!(tracker.typing_to(2, t0), vec![1]);
        assert_eq!(tracker.typing_to(2, t0 + Duration::seconds(3)), vec![]);
    }

    #[test]
    fn events_reach_subscribers() {
        let tracker = PresenceTracker::new();
        let events = tracker.subscribe();
        let t0 = now();

        tracker.announce(5, t0);
        tracker.set_typing(5, 6, t0);
        tracker.sweep(t0 + Duration::seconds(3));
        tracker.depart(5, t0 + Duration::seconds(4));

        assert_eq!(events.recv().unwrap(), PresenceEvent::Join(5));
        assert_eq!(
            events.recv().unwrap(),
            PresenceEvent::Typing {
                sender_id: 5,
                receiver_id: 6,
                active: true
            }
        );
        assert_eq!(
            events.recv().unwrap(),
            PresenceEvent::Typing {
                sender_id: 5,
                receiver_id: 6,
                active: false
            }
        );
        assert_eq!(events.recv().unwrap(), PresenceEvent::Leave(5));
    }

    #[test]
    fn depart_clears_typing() {
        let tracker = PresenceTracker::new();
        let t0 = now();
        tracker.announce(1, t0);
        tracker.set_typing(1, 2, t0);
        tracker.depart(1, t0);
        assert_eq!(tracker.typing_to(2, t0), vec![]);
    }
}
