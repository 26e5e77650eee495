use crate::{
    group_members::GroupMember, groups::Group, medias::Media, safe_string::SafeString,
    schema::group_messages, users::User, Connection, Error, Result,
};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Clone, Queryable, Identifiable, Associations, Serialize)]
#[belongs_to(Group)]
pub struct GroupMessage {
    pub id: i32,
    pub group_id: i32,
    pub sender_id: i32,
    pub content: SafeString,
    pub audio_id: Option<i32>,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "group_messages"]
pub struct NewGroupMessage {
    pub group_id: i32,
    pub sender_id: i32,
    pub content: SafeString,
    pub audio_id: Option<i32>,
}

impl GroupMessage {
    insert!(group_messages, NewGroupMessage);
    get!(group_messages);

    /// Posts a message to a group. Only members may write.
    pub fn send(
        conn: &Connection,
        group: &Group,
        sender: &User,
        content: SafeString,
        audio_id: Option<i32>,
    ) -> Result<GroupMessage> {
        if !GroupMember::is_member(conn, group.id, sender.id)? {
            return Err(Error::Unauthorized);
        }
        if content.is_empty() && audio_id.is_none() {
            return Err(Error::InvalidValue);
        }
        if let Some(id) = audio_id {
            Media::get(conn, id)?;
        }
        GroupMessage::insert(
            conn,
            NewGroupMessage {
                group_id: group.id,
                sender_id: sender.id,
                content,
                audio_id,
            },
        )
    }

    /// Message history of a group, oldest first. The caller must already
    /// have checked membership.
    pub fn history(conn: &Connection, group_id: i32) -> Result<Vec<GroupMessage>> {
        group_messages::table
            .filter(group_messages::group_id.eq(group_id))
            .order(group_messages::creation_date.asc())
            .load(conn)
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
    fn only_members_post() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let group = Group::create(&conn, &users[0], "room", &[users[1].id]).unwrap();

            GroupMessage::send(&conn, &group, &users[1], SafeString::new("hello all"), None)
                .unwrap();
            assert!(matches!(
                GroupMessage::send(&conn, &group, &users[2], SafeString::new("intruder"), None),
                Err(Error::Unauthorized)
            ));
            assert_eq!(GroupMessage::history(&conn, group.id).unwrap().len(), 1);
            Ok(())
        });
    }
}
