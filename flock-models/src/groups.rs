use crate::{
    group_members::{GroupMember, NewGroupMember},
    schema::{group_members, group_messages, groups},
    users::User,
    Connection, Error, Result,
};
use chrono::NaiveDateTime;
use diesel::{self, Connection as _, ExpressionMethods, QueryDsl, RunQueryDsl};

/// A group chat. The owner is always a member with admin rights.
#[derive(Clone, Queryable, Identifiable, Serialize)]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub owner_id: i32,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "groups"]
pub struct NewGroup {
    pub name: String,
    pub owner_id: i32,
}

impl Group {
    insert!(groups, NewGroup);
    get!(groups);

    /// Creates a group and enrolls the owner plus the given members in one
    /// transaction.
    pub fn create(
        conn: &Connection,
        owner: &User,
        name: &str,
        member_ids: &[i32],
    ) -> Result<Group> {
        if name.trim().is_empty() {
            return Err(Error::InvalidValue);
        }
        conn.transaction(|| {
            let group = Group::insert(
                conn,
                NewGroup {
                    name: name.trim().to_string(),
                    owner_id: owner.id,
                },
            )?;
            GroupMember::insert(
                conn,
                NewGroupMember {
                    group_id: group.id,
                    user_id: owner.id,
                    is_admin: true,
                },
            )?;
            for &user_id in member_ids.iter().filter(|&&id| id != owner.id) {
                User::get(conn, user_id)?;
                GroupMember::insert(
                    conn,
                    NewGroupMember {
                        group_id: group.id,
                        user_id,
                        is_admin: false,
                    },
                )?;
            }
            Ok(group)
        })
    }

    pub fn rename(&self, conn: &Connection, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::InvalidValue);
        }
        diesel::update(self)
            .set(groups::name.eq(name.trim()))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    /// Groups the user belongs to, most recently created first.
    pub fn for_user(conn: &Connection, user: &User) -> Result<Vec<Group>> {
        group_members::table
            .filter(group_members::user_id.eq(user.id))
            .inner_join(groups::table)
            .select(groups::all_columns)
            .order(groups::creation_date.desc())
            .load(conn)
            .map_err(Error::from)
    }

    /// Deletes the group with its memberships and message history.
    pub fn delete(&self, conn: &Connection) -> Result<()> {
        conn.transaction(|| {
            diesel::delete(
                group_messages::table.filter(group_messages::group_id.eq(self.id)),
            )
            .execute(conn)?;
            diesel::delete(group_members::table.filter(group_members::group_id.eq(self.id)))
                .execute(conn)?;
            diesel::delete(self).execute(conn)?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests::fill_database};
    use diesel::Connection as _;

    #[test]
    fn owner_is_enrolled_as_admin() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let group =
                Group::create(&conn, &users[0], "weekend plans", &[users[1].id]).unwrap();

            let owner = GroupMember::find(&conn, group.id, users[0].id).unwrap();
            assert!(owner.is_admin);
            let member = GroupMember::find(&conn, group.id, users[1].id).unwrap();
            assert!(!member.is_admin);
            Ok(())
        });
    }

    #[test]
    fn blank_name_is_rejected() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            assert!(matches!(
                Group::create(&conn, &users[0], "   ", &[]),
                Err(Error::InvalidValue)
            ));
            Ok(())
        });
    }

    #[test]
    fn delete_clears_memberships() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let group = Group::create(&conn, &users[0], "ephemeral", &[users[1].id]).unwrap();
            group.delete(&conn).unwrap();

            assert!(Group::get(&conn, group.id).is_err());
            assert!(GroupMember::find(&conn, group.id, users[1].id).is_err());
            assert!(Group::for_user(&conn, &users[1]).unwrap().is_empty());
            Ok(())
        });
    }
}
