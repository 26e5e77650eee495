use crate::{
    friendships::Friendship, medias::Media, safe_string::SafeString, schema::stories, users::User,
    Connection, Error, Result,
};
use chrono::{Duration, NaiveDateTime, Utc};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

/// How long a story stays visible.
pub const STORY_LIFETIME_HOURS: i64 = 24;

/// An ephemeral post, visible to the author's friends for 24 hours. Expired
/// rows stay in the table until the cleanup job runs, so every read path
/// filters on `expires_at`.
#[derive(Clone, Queryable, Identifiable, Serialize)]
#[table_name = "stories"]
pub struct Story {
    pub id: i32,
    pub user_id: i32,
    pub media_id: Option<i32>,
    pub body: Option<SafeString>,
    pub expires_at: NaiveDateTime,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "stories"]
pub struct NewStory {
    pub user_id: i32,
    pub media_id: Option<i32>,
    pub body: Option<SafeString>,
    pub expires_at: NaiveDateTime,
}

impl Story {
    insert!(stories, NewStory);
    get!(stories);

    /// Publishes a story. At least one of a media attachment or a text body
    /// is required.
    pub fn create(
        conn: &Connection,
        author: &User,
        media_id: Option<i32>,
        body: Option<SafeString>,
    ) -> Result<Story> {
        if media_id.is_none() && body.as_ref().map(|b| b.is_empty()).unwrap_or(true) {
            return Err(Error::InvalidValue);
        }
        if let Some(id) = media_id {
            Media::get(conn, id)?;
        }
        Story::insert(
            conn,
            NewStory {
                user_id: author.id,
                media_id,
                body,
                expires_at: (Utc::now() + Duration::hours(STORY_LIFETIME_HOURS)).naive_utc(),
            },
        )
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now().naive_utc()
    }

    /// Live stories of a single user, newest first.
    pub fn for_user(conn: &Connection, user_id: i32) -> Result<Vec<Story>> {
        stories::table
            .filter(stories::user_id.eq(user_id))
            .filter(stories::expires_at.gt(Utc::now().naive_utc()))
            .order(stories::creation_date.desc())
            .load(conn)
            .map_err(Error::from)
    }

    /// The story tray: live stories from the viewer's friends plus their own,
    /// newest first.
    pub fn tray_for(conn: &Connection, viewer: &User) -> Result<Vec<Story>> {
        let mut author_ids = Friendship::friend_ids(conn, viewer.id)?;
        author_ids.push(viewer.id);
        stories::table
            .filter(stories::user_id.eq_any(author_ids))
            .filter(stories::expires_at.gt(Utc::now().naive_utc()))
            .order(stories::creation_date.desc())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.user_id)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self)
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    /// Removes every expired story. Meant to be called from the periodic
    /// cleanup job.
    pub fn purge_expired(conn: &Connection) -> Result<usize> {
        diesel::delete(stories::table.filter(stories::expires_at.le(Utc::now().naive_utc())))
            .execute(conn)
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests::fill_database};
    use diesel::Connection as _;

    fn expired_story(conn: &Connection, author: &User) -> Story {
        Story::insert(
            conn,
            NewStory {
                user_id: author.id,
                media_id: None,
                body: Some(SafeString::new("yesterday's news")),
                expires_at: (Utc::now() - Duration::hours(1)).naive_utc(),
            },
        )
        .unwrap()
    }

    #[test]
    fn tray_shows_friends_not_strangers() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            Friendship::connect(&conn, users[0].id, users[1].id).unwrap();

            Story::create(&conn, &users[0], None, Some(SafeString::new("from a friend")))
                .unwrap();
            Story::create(&conn, &users[2], None, Some(SafeString::new("from a stranger")))
                .unwrap();

            let tray = Story::tray_for(&conn, &users[1]).unwrap();
            assert_eq!(tray.len(), 1);
            assert_eq!(tray[0].user_id, users[0].id);
            Ok(())
        });
    }

    #[test]
    fn expired_stories_are_invisible() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            expired_story(&conn, &users[0]);
            assert!(Story::for_user(&conn, users[0].id).unwrap().is_empty());
            assert!(Story::tray_for(&conn, &users[0]).unwrap().is_empty());
            Ok(())
        });
    }

    #[test]
    fn purge_only_removes_expired() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            expired_story(&conn, &users[0]);
            let live =
                Story::create(&conn, &users[0], None, Some(SafeString::new("still here")))
                    .unwrap();

            assert_eq!(Story::purge_expired(&conn).unwrap(), 1);
            assert!(Story::get(&conn, live.id).is_ok());
            Ok(())
        });
    }

    #[test]
    fn author_can_delete_early() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let story =
                Story::create(&conn, &users[0], None, Some(SafeString::new("oops")))
                    .unwrap();
            story.delete(&conn).unwrap();
            assert!(Story::get(&conn, story.id).is_err());
            Ok(())
        });
    }

    #[test]
    fn empty_story_is_rejected() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            assert!(matches!(
                Story::create(&conn, &users[0], None, None),
                Err(Error::InvalidValue)
            ));
            assert!(matches!(
                Story::create(&conn, &users[0], None, Some(SafeString::new(""))),
                Err(Error::InvalidValue)
            ));
            Ok(())
        });
    }
}
