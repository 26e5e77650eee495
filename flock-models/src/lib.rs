#![allow(clippy::module_name_repetitions)]

#[macro_use]
extern crate diesel;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate serde_derive;
#[cfg(test)]
#[macro_use]
extern crate diesel_migrations;

#[cfg(all(feature = "postgres", not(feature = "sqlite")))]
pub type Connection = diesel::PgConnection;

#[cfg(all(feature = "sqlite", not(feature = "postgres")))]
pub type Connection = diesel::SqliteConnection;

/// All the possible errors that can be encountered in this crate
#[derive(Debug)]
pub enum Error {
    Db(diesel::result::Error),
    Expired,
    InvalidValue,
    Io(std::io::Error),
    NotFound,
    SerDe(serde_json::Error),
    Unauthorized,
}

impl From<diesel::result::Error> for Error {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Error::NotFound,
            _ => Error::Db(err),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerDe(err)
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(_: bcrypt::BcryptError) -> Self {
        Error::Unauthorized
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Adds a function to a model, that returns the first
/// matching row for a given list of fields.
///
/// Usage:
///
/// ```rust
/// impl Model {
///     find_by!(model_table, name_of_the_function, field1 as String, field2 as i32);
/// }
///
/// // Get the Model with field1 == "", and field2 == 0
/// Model::name_of_the_function(connection, String::new(), 0);
/// ```
macro_rules! find_by {
    ($table:ident, $fn:ident, $($col:ident as $type:ty),+) => {
        /// Try to find a $table with a given $col
        pub fn $fn(conn: &crate::Connection, $($col: $type),+) -> Result<Self> {
            $table::table
                $(.filter($table::$col.eq($col)))+
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// List all rows of a model, with field-based filtering.
///
/// Usage:
///
/// ```rust
/// impl Model {
///     list_by!(model_table, name_of_the_function, field1 as String);
/// }
///
/// // To get all Models with field1 == ""
/// Model::name_of_the_function(connection, String::new());
/// ```
macro_rules! list_by {
    ($table:ident, $fn:ident, $($col:ident as $type:ty),+) => {
        /// Try to find all $table with a given $col
        pub fn $fn(conn: &crate::Connection, $($col: $type),+) -> Result<Vec<Self>> {
            $table::table
                $(.filter($table::$col.eq($col)))+
                .load::<Self>(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to retrieve a row by its id
///
/// # Usage
///
/// ```rust
/// impl Model {
///     get!(model_table);
/// }
///
/// // Get the Model with ID 1
/// Model::get(connection, 1);
/// ```
macro_rules! get {
    ($table:ident) => {
        pub fn get(conn: &crate::Connection, id: i32) -> Result<Self> {
            $table::table
                .filter($table::id.eq(id))
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Adds a function to a model to insert a new row
///
/// # Usage
///
/// ```rust
/// impl Model {
///     insert!(model_table, NewModelType);
/// }
///
/// // Insert a new row
/// Model::insert(connection, NewModelType::new());
/// ```
macro_rules! insert {
    ($table:ident, $from:ty) => {
        insert!($table, $from, |x, _conn| Ok(x));
    };
    ($table:ident, $from:ty, |$val:ident, $conn:ident| $( $after:tt )+) => {
        last!($table);

        pub fn insert(conn: &crate::Connection, new: $from) -> Result<Self> {
            diesel::insert_into($table::table)
                .values(new)
                .execute(conn)?;
            #[allow(unused_mut)]
            let (mut $val, $conn) = (Self::last(conn)?, conn);
            $( $after )+
        }
    };
}

/// Returns the last row of a table.
///
/// # Usage
///
/// ```rust
/// impl Model {
///     last!(model_table);
/// }
///
/// // Get the last Model
/// Model::last(connection)
/// ```
macro_rules! last {
    ($table:ident) => {
        pub fn last(conn: &crate::Connection) -> Result<Self> {
            $table::table
                .order_by($table::id.desc())
                .first(conn)
                .map_err(Error::from)
        }
    };
}

/// Builds an absolute URL for a resource served by this instance.
pub fn public_url(path: &str) -> String {
    format!(
        "https://{}/{}",
        CONFIG.base_url,
        path.trim_start_matches('/')
    )
}

pub const ITEMS_PER_PAGE: i32 = 12;

pub use crate::config::CONFIG;

pub mod admin;
pub mod api_tokens;
pub mod comments;
pub mod config;
pub mod db_conn;
pub mod follows;
pub mod friend_requests;
pub mod friendships;
pub mod group_members;
pub mod group_messages;
pub mod groups;
pub mod likes;
pub mod medias;
pub mod messages;
pub mod notifications;
pub mod password_reset_requests;
pub mod post_medias;
pub mod posts;
pub mod reports;
pub mod safe_string;
pub mod schema;
pub mod stories;
pub mod streams;
pub mod users;
pub mod verification_requests;

#[cfg(test)]
pub(crate) mod tests {
    use crate::{db_conn, CONFIG};
    use diesel::r2d2::{ConnectionManager, Pool};

    #[cfg(all(feature = "postgres", not(feature = "sqlite")))]
    embed_migrations!("../migrations/postgres");
    #[cfg(all(feature = "sqlite", not(feature = "postgres")))]
    embed_migrations!("../migrations/sqlite");

    lazy_static! {
        static ref DB_POOL: db_conn::DbPool = {
            let pool = Pool::builder()
                .max_size(2)
                .build(ConnectionManager::new(CONFIG.database_url.as_str()))
                .expect("Couldn't build test pool");
            embedded_migrations::run(&pool.get().unwrap()).expect("Couldn't run migrations");
            pool
        };
    }

    pub fn db() -> db_conn::DbConn {
        db_conn::DbConn(DB_POOL.get().unwrap())
    }
}
