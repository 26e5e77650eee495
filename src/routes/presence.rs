use chrono::Utc;
use flock_common::presence::PresenceTracker;
use flock_models::users::User;
use rocket::State;
use rocket_contrib::json::Json;
use std::sync::Arc;

#[get("/presence")]
pub fn online(_user: User, tracker: State<'_, Arc<PresenceTracker>>) -> Json<serde_json::Value> {
    Json(json!({ "online": tracker.online(Utc::now()) }))
}

/// Clients call this on a short interval; a user whose heartbeats stop is
/// dropped from the online set once its deadline passes.
#[post("/presence/heartbeat")]
pub fn heartbeat(user: User, tracker: State<'_, Arc<PresenceTracker>>) -> Json<serde_json::Value> {
    tracker.announce(user.id, Utc::now());
    Json(json!({ "ok": true }))
}

#[post("/presence/depart")]
pub fn depart(user: User, tracker: State<'_, Arc<PresenceTracker>>) -> Json<serde_json::Value> {
    tracker.depart(user.id, Utc::now());
    Json(json!({ "ok": true }))
}

#[derive(Deserialize)]
pub struct TypingData {
    receiver_id: i32,
}

/// Typing indicators expire on their own after a couple of seconds, so the
/// client only ever announces "still typing".
#[post("/presence/typing", data = "<data>")]
pub fn set_typing(
    user: User,
    tracker: State<'_, Arc<PresenceTracker>>,
    data: Json<TypingData>,
) -> Json<serde_json::Value> {
    tracker.set_typing(user.id, data.receiver_id, Utc::now());
    Json(json!({ "ok": true }))
}

#[get("/presence/typing")]
pub fn typing(user: User, tracker: State<'_, Arc<PresenceTracker>>) -> Json<serde_json::Value> {
    Json(json!({ "typing": tracker.typing_to(user.id, Utc::now()) }))
}
