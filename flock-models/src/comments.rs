use crate::{
    notifications::*, posts::Post, safe_string::SafeString, schema::comments, users::User,
    Connection, Error, Result,
};
use chrono::NaiveDateTime;
use diesel::{self, Connection as _, ExpressionMethods, QueryDsl, RunQueryDsl};

/// A comment on a post. `parent_comment_id` links replies to their parent;
/// the UI renders one level of nesting but the data model doesn't care.
#[derive(Clone, Queryable, Identifiable, Associations, Serialize)]
#[belongs_to(Post)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub author_id: i32,
    pub content: SafeString,
    pub parent_comment_id: Option<i32>,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "comments"]
pub struct NewComment {
    pub post_id: i32,
    pub author_id: i32,
    pub content: SafeString,
    pub parent_comment_id: Option<i32>,
}

impl Comment {
    insert!(comments, NewComment);
    get!(comments);
    list_by!(comments, for_post, post_id as i32);

    /// Creates a comment and notifies the post's author.
    pub fn create(
        conn: &Connection,
        author: &User,
        post: &Post,
        content: SafeString,
        parent_comment_id: Option<i32>,
    ) -> Result<Comment> {
        if let Some(parent_id) = parent_comment_id {
            let parent = Comment::get(conn, parent_id)?;
            if parent.post_id != post.id {
                return Err(Error::InvalidValue);
            }
        }
        let res = Comment::insert(
            conn,
            NewComment {
                post_id: post.id,
                author_id: author.id,
                content,
                parent_comment_id,
            },
        )?;
        res.notify(conn)?;
        Ok(res)
    }

    pub fn get_post(&self, conn: &Connection) -> Result<Post> {
        Post::get(conn, self.post_id)
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    /// Top-level comments of a post, oldest first.
    pub fn top_level(conn: &Connection, post: &Post) -> Result<Vec<Comment>> {
        comments::table
            .filter(comments::post_id.eq(post.id))
            .filter(comments::parent_comment_id.is_null())
            .order(comments::creation_date.asc())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn replies(&self, conn: &Connection) -> Result<Vec<Comment>> {
        comments::table
            .filter(comments::parent_comment_id.eq(self.id))
            .order(comments::creation_date.asc())
            .load(conn)
            .map_err(Error::from)
    }

    pub fn count_for_post(conn: &Connection, post_id: i32) -> Result<i64> {
        comments::table
            .filter(comments::post_id.eq(post_id))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    fn notify(&self, conn: &Connection) -> Result<()> {
        let post = self.get_post(conn)?;
        if post.author_id == self.author_id {
            return Ok(());
        }
        Notification::insert(
            conn,
            NewNotification {
                kind: notification_kind::COMMENT.to_string(),
                object_id: self.id,
                user_id: post.author_id,
            },
        )
        .map(|_| ())
    }

    /// Deletes the comment together with its direct replies and their likes,
    /// so no orphaned reply rows are left behind.
    pub fn delete(&self, conn: &Connection) -> Result<()> {
        use crate::likes::like_target;
        use crate::schema::likes;

        conn.transaction(|| {
            let mut doomed = vec![self.id];
            doomed.extend(self.replies(conn)?.iter().map(|c| c.id));

            diesel::delete(
                likes::table
                    .filter(likes::subject_id.eq_any(&doomed))
                    .filter(likes::subject_kind.eq(like_target::COMMENT)),
            )
            .execute(conn)?;
            diesel::delete(comments::table.filter(comments::id.eq_any(&doomed)))
                .execute(conn)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{posts::tests::fill_posts, tests::db, users::tests::fill_database};
    use diesel::Connection as _;

    #[test]
    fn reply_tree() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);

            let top =
                Comment::create(&conn, &users[1], &posts[0], SafeString::new("first"), None)
                    .unwrap();
            let reply = Comment::create(
                &conn,
                &users[2],
                &posts[0],
                SafeString::new("reply"),
                Some(top.id),
            )
            .unwrap();

            let top_level = Comment::top_level(&conn, &posts[0]).unwrap();
            assert_eq!(top_level.len(), 1);
            assert_eq!(top_level[0].id, top.id);

            let replies = top.replies(&conn).unwrap();
            assert_eq!(replies.len(), 1);
            assert_eq!(replies[0].id, reply.id);
            Ok(())
        });
    }

    #[test]
    fn reply_must_target_same_post() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);
            let top =
                Comment::create(&conn, &users[1], &posts[0], SafeString::new("hi"), None)
                    .unwrap();
            assert!(matches!(
                Comment::create(
                    &conn,
                    &users[2],
                    &posts[2],
                    SafeString::new("wrong thread"),
                    Some(top.id)
                ),
                Err(Error::InvalidValue)
            ));
            Ok(())
        });
    }

    #[test]
    fn comment_notifies_post_author() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);
            let comment =
                Comment::create(&conn, &users[1], &posts[0], SafeString::new("hey"), None)
                    .unwrap();
            let notif = Notification::find(&conn, notification_kind::COMMENT, comment.id).unwrap();
            assert_eq!(notif.user_id, posts[0].author_id);
            Ok(())
        });
    }

    #[test]
    fn delete_takes_replies_along() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);
            let top =
                Comment::create(&conn, &users[1], &posts[0], SafeString::new("top"), None)
                    .unwrap();
            Comment::create(
                &conn,
                &users[2],
                &posts[0],
                SafeString::new("reply"),
                Some(top.id),
            )
            .unwrap();

            top.delete(&conn).unwrap();
            assert!(Comment::for_post(&conn, posts[0].id).unwrap().is_empty());
            Ok(())
        });
    }
}
