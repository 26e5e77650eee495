#![feature(proc_macro_hygiene, decl_macro)]

#[macro_use]
extern crate rocket;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate serde_json;

use diesel::r2d2::ConnectionManager;
use flock_common::presence::PresenceTracker;
use flock_models::{db_conn::DbPool, Connection, CONFIG};
use scheduled_thread_pool::ScheduledThreadPool;
use std::{process::exit, sync::Arc, time::Duration};
use tracing::{error, info, warn};
use tracing_subscriber::FmtSubscriber;

mod api;
mod mail;
mod routes;

fn init_pool() -> Option<DbPool> {
    let manager = ConnectionManager::<Connection>::new(CONFIG.database_url.as_str());
    let mut builder = DbPool::builder();
    if let Some(max_size) = CONFIG.db_max_size {
        builder = builder.max_size(max_size);
    }
    builder = builder.min_idle(CONFIG.db_min_idle);
    builder.build(manager).ok()
}

fn main() {
    match dotenv::dotenv() {
        Ok(path) => info!("Configuration read from {}", path.display()),
        Err(ref e) if e.not_found() => warn!("no .env was found"),
        e => e.map(|_| ()).unwrap(),
    }
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    let dbpool = init_pool().expect("main: database pool initialization error");

    let workpool = ScheduledThreadPool::with_name("flock-worker", num_cpus::get());
    let presence = Arc::new(PresenceTracker::new());

    // purge presence deadlines and expired stories in the background
    {
        let presence = presence.clone();
        workpool.execute_at_fixed_rate(
            Duration::from_secs(5),
            Duration::from_secs(5),
            move || presence.sweep(chrono::Utc::now()),
        );
    }
    {
        let pool = dbpool.clone();
        workpool.execute_at_fixed_rate(
            Duration::from_secs(60 * 10),
            Duration::from_secs(60 * 10),
            move || {
                if let Ok(conn) = pool.get() {
                    match flock_models::stories::Story::purge_expired(&conn) {
                        Ok(0) => {}
                        Ok(n) => info!("cleaned {} expired stories", n),
                        Err(e) => error!("story cleanup error: {:?}", e),
                    }
                }
            },
        );
    }

    let mail = mail::init();
    if mail.is_none() && CONFIG.rocket.is_ok() {
        warn!("Warning: the email server is not configured (or not completely).");
        warn!("Please refer to the documentation to see how to configure it.");
    }

    let rocket = rocket::custom(CONFIG.rocket.clone().unwrap_or_else(|e| {
        error!("Error with Rocket configuration: {:?}", e);
        exit(1)
    }))
    .mount(
        "/api/v1",
        routes![
            routes::session::login,
            routes::session::logout,
            routes::session::password_reset_request,
            routes::session::password_reset,
            routes::users::signup,
            routes::users::me,
            routes::users::details,
            routes::users::edit,
            routes::users::update_credentials,
            routes::users::set_role,
            routes::users::list,
            routes::posts::feed,
            routes::posts::video_feed,
            routes::posts::details,
            routes::posts::create,
            routes::posts::delete,
            routes::posts::repost,
            routes::posts::set_boost,
            routes::comments::list,
            routes::comments::create,
            routes::comments::delete,
            routes::likes::toggle,
            routes::friends::send_request,
            routes::friends::accept_request,
            routes::friends::reject_request,
            routes::friends::incoming,
            routes::friends::outgoing,
            routes::friends::list,
            routes::friends::unfriend,
            routes::follows::follow,
            routes::follows::unfollow,
            routes::follows::counts,
            routes::messages::conversation,
            routes::messages::send,
            routes::messages::mark_read,
            routes::messages::inbox,
            routes::messages::unread_count,
            routes::groups::create,
            routes::groups::list,
            routes::groups::rename,
            routes::groups::delete,
            routes::groups::details,
            routes::groups::add_member,
            routes::groups::remove_member,
            routes::groups::set_admin,
            routes::groups::send_message,
            routes::groups::history,
            routes::stories::create,
            routes::stories::tray,
            routes::stories::for_user,
            routes::stories::delete,
            routes::streams::start,
            routes::streams::end,
            routes::streams::live,
            routes::streams::join,
            routes::streams::leave,
            routes::streams::viewers,
            routes::notifications::list,
            routes::notifications::unread_count,
            routes::notifications::mark_read,
            routes::notifications::mark_all_read,
            routes::reports::create,
            routes::reports::list,
            routes::verification::apply,
            routes::verification::pending,
            routes::verification::approve,
            routes::verification::reject,
            routes::medias::upload,
            routes::medias::list,
            routes::medias::details,
            routes::medias::delete,
            routes::presence::online,
            routes::presence::heartbeat,
            routes::presence::depart,
            routes::presence::set_typing,
            routes::presence::typing,
            api::issue_token,
            api::list_tokens,
            api::revoke_token,
            api::posts::get,
            api::posts::list,
        ],
    )
    .register(catchers![
        routes::errors::not_found,
        routes::errors::unauthorized,
        routes::errors::server_error
    ])
    .manage(dbpool)
    .manage(presence)
    .manage(std::sync::Mutex::new(mail));

    ctrlc::set_handler(move || exit(0)).expect("Error setting Ctrl-C handler");

    error!("{}", rocket.launch());
}
