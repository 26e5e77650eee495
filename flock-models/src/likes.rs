use crate::{
    comments::Comment, notifications::*, posts::Post, schema::likes, users::User, Connection,
    Error, Result,
};
use chrono::NaiveDateTime;
use diesel::{
    self, result::DatabaseErrorKind, result::Error as DieselError, ExpressionMethods, QueryDsl,
    RunQueryDsl,
};

/// What a like points at. Videos are posts surfaced on the video feed, but
/// the hosted schema kept their likes apart, and so do we.
pub mod like_target {
    pub const COMMENT: &str = "comment";
    pub const POST: &str = "post";
    pub const VIDEO: &str = "video";

    pub fn is_valid(kind: &str) -> bool {
        matches!(kind, COMMENT | POST | VIDEO)
    }
}

/// A (subject, account) pair. Existence is the only state: liking inserts,
/// unliking deletes, nothing is ever updated.
#[derive(Clone, Queryable, Identifiable, Serialize)]
pub struct Like {
    pub id: i32,
    pub user_id: i32,
    pub subject_id: i32,
    pub subject_kind: String,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "likes"]
pub struct NewLike {
    pub user_id: i32,
    pub subject_id: i32,
    pub subject_kind: String,
}

impl Like {
    insert!(likes, NewLike);
    get!(likes);

    pub fn find_by_user_on_subject(
        conn: &Connection,
        user_id: i32,
        subject_id: i32,
        kind: &str,
    ) -> Result<Like> {
        likes::table
            .filter(likes::user_id.eq(user_id))
            .filter(likes::subject_id.eq(subject_id))
            .filter(likes::subject_kind.eq(kind))
            .first(conn)
            .map_err(Error::from)
    }

    /// Likes the subject if it isn't liked by this account yet, unlikes it
    /// otherwise. Returns whether the subject is liked afterwards.
    ///
    /// Two rapid toggles can race: the second insert then trips the unique
    /// constraint, or the second delete removes zero rows. Both outcomes
    /// leave the pair in a valid state, so they are swallowed rather than
    /// surfaced to the caller.
    pub fn toggle(conn: &Connection, user: &User, subject_id: i32, kind: &str) -> Result<bool> {
        if !like_target::is_valid(kind) {
            return Err(Error::InvalidValue);
        }
        match Like::find_by_user_on_subject(conn, user.id, subject_id, kind) {
            Ok(like) => {
                like.delete(conn)?;
                Ok(false)
            }
            Err(Error::NotFound) => {
                let inserted = diesel::insert_into(likes::table)
                    .values(NewLike {
                        user_id: user.id,
                        subject_id,
                        subject_kind: kind.to_string(),
                    })
                    .execute(conn);
                match inserted {
                    Ok(_) => {
                        let like =
                            Like::find_by_user_on_subject(conn, user.id, subject_id, kind)?;
                        like.notify(conn)?;
                        Ok(true)
                    }
                    // a concurrent toggle won the insert; the subject is liked
                    Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                        Ok(true)
                    }
                    Err(err) => Err(Error::from(err)),
                }
            }
            Err(err) => Err(err),
        }
    }

    pub fn count_for_subject(conn: &Connection, subject_id: i32, kind: &str) -> Result<i64> {
        likes::table
            .filter(likes::subject_id.eq(subject_id))
            .filter(likes::subject_kind.eq(kind))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    fn notify(&self, conn: &Connection) -> Result<()> {
        let recipient = match self.subject_kind.as_str() {
            like_target::POST | like_target::VIDEO => {
                Post::get(conn, self.subject_id)?.author_id
            }
            like_target::COMMENT => Comment::get(conn, self.subject_id)?.author_id,
            _ => return Ok(()),
        };
        // no notification for liking your own content
        if recipient == self.user_id {
            return Ok(());
        }
        Notification::insert(
            conn,
            NewNotification {
                kind: notification_kind::LIKE.to_string(),
                object_id: self.id,
                user_id: recipient,
            },
        )
        .map(|_| ())
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self).execute(conn)?;

        // delete associated notification if any
        if let Ok(notif) = Notification::find(conn, notification_kind::LIKE, self.id) {
            notif.delete(conn)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        posts::tests::fill_posts, safe_string::SafeString, tests::db,
        users::tests::fill_database,
    };
    use diesel::Connection as _;

    #[test]
    fn toggle_twice_round_trips() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);

            assert!(Like::toggle(&conn, &users[2], posts[0].id, like_target::POST).unwrap());
            assert_eq!(
                Like::count_for_subject(&conn, posts[0].id, like_target::POST).unwrap(),
                1
            );

            assert!(!Like::toggle(&conn, &users[2], posts[0].id, like_target::POST).unwrap());
            assert_eq!(
                Like::count_for_subject(&conn, posts[0].id, like_target::POST).unwrap(),
                0
            );
            Ok(())
        });
    }

    #[test]
    fn stale_delete_is_benign() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);

            Like::toggle(&conn, &users[2], posts[0].id, like_target::POST).unwrap();
            let row = Like::find_by_user_on_subject(
                &conn,
                users[2].id,
                posts[0].id,
                like_target::POST,
            )
            .unwrap();

            // the duplicate-tap race on the unlike side: the same row gets
            // deleted twice, the second delete removes zero rows
            row.delete(&conn).unwrap();
            row.delete(&conn).unwrap();
            assert_eq!(
                Like::count_for_subject(&conn, posts[0].id, like_target::POST).unwrap(),
                0
            );
            Ok(())
        });
    }

    #[test]
    fn kinds_are_distinct() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);

            Like::toggle(&conn, &users[2], posts[0].id, like_target::POST).unwrap();
            Like::toggle(&conn, &users[2], posts[0].id, like_target::VIDEO).unwrap();
            assert_eq!(
                Like::count_for_subject(&conn, posts[0].id, like_target::POST).unwrap(),
                1
            );
            assert_eq!(
                Like::count_for_subject(&conn, posts[0].id, like_target::VIDEO).unwrap(),
                1
            );

            assert!(matches!(
                Like::toggle(&conn, &users[2], posts[0].id, "page"),
                Err(Error::InvalidValue)
            ));
            Ok(())
        });
    }

    #[test]
    fn like_notifies_author_once() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);

            Like::toggle(&conn, &users[2], posts[0].id, like_target::POST).unwrap();
            let like = Like::find_by_user_on_subject(
                &conn,
                users[2].id,
                posts[0].id,
                like_target::POST,
            )
            .unwrap();
            let notif = Notification::find(&conn, notification_kind::LIKE, like.id).unwrap();
            assert_eq!(notif.user_id, posts[0].author_id);

            // unliking removes it again
            Like::toggle(&conn, &users[2], posts[0].id, like_target::POST).unwrap();
            assert!(Notification::find(&conn, notification_kind::LIKE, like.id).is_err());
            Ok(())
        });
    }

    #[test]
    fn own_content_is_not_notified() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);
            let author = User::get(&conn, posts[0].author_id).unwrap();

            Like::toggle(&conn, &author, posts[0].id, like_target::POST).unwrap();
            let like = Like::find_by_user_on_subject(
                &conn,
                author.id,
                posts[0].id,
                like_target::POST,
            )
            .unwrap();
            assert!(Notification::find(&conn, notification_kind::LIKE, like.id).is_err());
            Ok(())
        });
    }

    #[test]
    fn comment_likes_notify_comment_author() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            use crate::comments::{Comment, NewComment};
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);
            let comment = Comment::insert(
                &conn,
                NewComment {
                    post_id: posts[0].id,
                    author_id: users[1].id,
                    content: SafeString::new("nice"),
                    parent_comment_id: None,
                },
            )
            .unwrap();

            Like::toggle(&conn, &users[2], comment.id, like_target::COMMENT).unwrap();
            let like = Like::find_by_user_on_subject(
                &conn,
                users[2].id,
                comment.id,
                like_target::COMMENT,
            )
            .unwrap();
            let notif = Notification::find(&conn, notification_kind::LIKE, like.id).unwrap();
            assert_eq!(notif.user_id, users[1].id);
            Ok(())
        });
    }
}
