use crate::{
    medias::Media, safe_string::SafeString, schema::messages, users::User, Connection, Error,
    Result,
};
use chrono::NaiveDateTime;
use diesel::{self, BoolExpressionMethods, ExpressionMethods, QueryDsl, RunQueryDsl};
use itertools::Itertools;

/// A direct message. `audio_id` points at a voice-note media when set.
#[derive(Clone, Queryable, Identifiable, Serialize)]
pub struct Message {
    pub id: i32,
    pub sender_id: i32,
    pub receiver_id: i32,
    pub content: SafeString,
    pub audio_id: Option<i32>,
    pub read: bool,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "messages"]
pub struct NewMessage {
    pub sender_id: i32,
    pub receiver_id: i32,
    pub content: SafeString,
    pub audio_id: Option<i32>,
}

impl Message {
    insert!(messages, NewMessage);
    get!(messages);

    /// Sends a message. Either text or a voice note is required, and you
    /// can't message yourself.
    pub fn send(
        conn: &Connection,
        sender: &User,
        receiver: &User,
        content: SafeString,
        audio_id: Option<i32>,
    ) -> Result<Message> {
        if sender.id == receiver.id {
            return Err(Error::InvalidValue);
        }
        if content.is_empty() && audio_id.is_none() {
            return Err(Error::InvalidValue);
        }
        if let Some(id) = audio_id {
            Media::get(conn, id)?;
        }
        Message::insert(
            conn,
            NewMessage {
                sender_id: sender.id,
                receiver_id: receiver.id,
                content,
                audio_id,
            },
        )
    }

    /// Full history between two users, oldest first.
    pub fn conversation(conn: &Connection, a: i32, b: i32) -> Result<Vec<Message>> {
        messages::table
            .filter(
                (messages::sender_id.eq(a).and(messages::receiver_id.eq(b)))
                    .or(messages::sender_id.eq(b).and(messages::receiver_id.eq(a))),
            )
            .order(messages::creation_date.asc())
            .load(conn)
            .map_err(Error::from)
    }

    /// The inbox view: for each correspondent, the most recent message
    /// exchanged with them, newest conversation first.
    pub fn inbox(conn: &Connection, user: &User) -> Result<Vec<Message>> {
        let all: Vec<Message> = messages::table
            .filter(
                messages::sender_id
                    .eq(user.id)
                    .or(messages::receiver_id.eq(user.id)),
            )
            .order(messages::creation_date.desc())
            .load(conn)?;
        Ok(all
            .into_iter()
            .unique_by(|m| {
                if m.sender_id == user.id {
                    m.receiver_id
                } else {
                    m.sender_id
                }
            })
            .collect())
    }

    /// Marks every message from `other` to `user` as read. Returns how many
    /// rows changed.
    pub fn mark_conversation_read(conn: &Connection, user: &User, other: i32) -> Result<usize> {
        diesel::update(
            messages::table
                .filter(messages::receiver_id.eq(user.id))
                .filter(messages::sender_id.eq(other))
                .filter(messages::read.eq(false)),
        )
        .set(messages::read.eq(true))
        .execute(conn)
        .map_err(Error::from)
    }

    pub fn count_unread(conn: &Connection, user: &User) -> Result<i64> {
        messages::table
            .filter(messages::receiver_id.eq(user.id))
            .filter(messages::read.eq(false))
            .count()
            .get_result(conn)
            .map_err(Error::from)
    }

    pub fn delete(&self, conn: &Connection) -> Result<()> {
        diesel::delete(self)
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests::fill_database};
    use diesel::Connection as _;

    #[test]
    fn conversation_is_symmetric() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            Message::send(&conn, &users[0], &users[1], SafeString::new("hi"), None).unwrap();
            Message::send(&conn, &users[1], &users[0], SafeString::new("hello"), None).unwrap();

            let a = Message::conversation(&conn, users[0].id, users[1].id).unwrap();
            let b = Message::conversation(&conn, users[1].id, users[0].id).unwrap();
            assert_eq!(a.len(), 2);
            assert_eq!(
                a.iter().map(|m| m.id).collect::<Vec<_>>(),
                b.iter().map(|m| m.id).collect::<Vec<_>>()
            );
            Ok(())
        });
    }

    #[test]
    fn inbox_keeps_latest_per_correspondent() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            Message::send(&conn, &users[0], &users[1], SafeString::new("one"), None).unwrap();
            Message::send(&conn, &users[1], &users[0], SafeString::new("two"), None).unwrap();
            Message::send(&conn, &users[2], &users[0], SafeString::new("three"), None).unwrap();

            let inbox = Message::inbox(&conn, &users[0]).unwrap();
            assert_eq!(inbox.len(), 2);
            assert_eq!(inbox[0].content.as_ref(), "three");
            assert_eq!(inbox[1].content.as_ref(), "two");
            Ok(())
        });
    }

    #[test]
    fn read_receipts() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            Message::send(&conn, &users[0], &users[1], SafeString::new("a"), None).unwrap();
            Message::send(&conn, &users[0], &users[1], SafeString::new("b"), None).unwrap();
            assert_eq!(Message::count_unread(&conn, &users[1]).unwrap(), 2);

            assert_eq!(
                Message::mark_conversation_read(&conn, &users[1], users[0].id).unwrap(),
                2
            );
            assert_eq!(Message::count_unread(&conn, &users[1]).unwrap(), 0);
            Ok(())
        });
    }

    #[test]
    fn self_message_is_rejected() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            assert!(matches!(
                Message::send(&conn, &users[0], &users[0], SafeString::new("me"), None),
                Err(Error::InvalidValue)
            ));
            Ok(())
        });
    }
}
