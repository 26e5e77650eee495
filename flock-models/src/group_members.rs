use crate::{
    groups::Group, schema::group_members, users::User, Connection, Error, Result,
};
use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl};

#[derive(Clone, Queryable, Identifiable, Associations, Serialize)]
#[belongs_to(Group)]
#[belongs_to(User)]
pub struct GroupMember {
    pub id: i32,
    pub group_id: i32,
    pub user_id: i32,
    pub is_admin: bool,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "group_members"]
pub struct NewGroupMember {
    pub group_id: i32,
    pub user_id: i32,
    pub is_admin: bool,
}

impl GroupMember {
    insert!(group_members, NewGroupMember);
    get!(group_members);
    find_by!(group_members, find, group_id as i32, user_id as i32);

    /// Adds a user to a group. Only group admins may invite; re-adding an
    /// existing member is a no-op.
    pub fn add(conn: &Connection, group: &Group, by: &User, user_id: i32) -> Result<GroupMember> {
        if !GroupMember::is_admin(conn, group.id, by.id)? {
            return Err(Error::Unauthorized);
        }
        if let Ok(existing) = GroupMember::find(conn, group.id, user_id) {
            return Ok(existing);
        }
        User::get(conn, user_id)?;
        GroupMember::insert(
            conn,
            NewGroupMember {
                group_id: group.id,
                user_id,
                is_admin: false,
            },
        )
    }

    /// Removes a member. Admins can remove anyone but the owner; members can
    /// always remove themselves.
    pub fn remove(conn: &Connection, group: &Group, by: &User, user_id: i32) -> Result<()> {
        if user_id == group.owner_id {
            return Err(Error::InvalidValue);
        }
        if by.id != user_id && !GroupMember::is_admin(conn, group.id, by.id)? {
            return Err(Error::Unauthorized);
        }
        let member = GroupMember::find(conn, group.id, user_id)?;
        diesel::delete(&member)
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    pub fn set_admin(conn: &Connection, group: &Group, by: &User, user_id: i32, admin: bool) -> Result<()> {
        if by.id != group.owner_id {
            return Err(Error::Unauthorized);
        }
        let member = GroupMember::find(conn, group.id, user_id)?;
        diesel::update(&member)
            .set(group_members::is_admin.eq(admin))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    pub fn is_member(conn: &Connection, group_id: i32, user_id: i32) -> Result<bool> {
        match GroupMember::find(conn, group_id, user_id) {
            Ok(_) => Ok(true),
            Err(Error::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn is_admin(conn: &Connection, group_id: i32, user_id: i32) -> Result<bool> {
        match GroupMember::find(conn, group_id, user_id) {
            Ok(m) => Ok(m.is_admin),
            Err(Error::NotFound) => Ok(false),
            Err(e) => Err(e),
        }
    }

    pub fn members(conn: &Connection, group_id: i32) -> Result<Vec<User>> {
        group_members::table
            .filter(group_members::group_id.eq(group_id))
            .inner_join(crate::schema::users::table)
            .select(crate::schema::users::all_columns)
            .load(conn)
            .map_err(Error::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{tests::db, users::tests::fill_database};
    use diesel::Connection as _;

    #[test]
    fn only_admins_invite() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let group = Group::create(&conn, &users[0], "club", &[users[1].id]).unwrap();

            assert!(matches!(
                GroupMember::add(&conn, &group, &users[1], users[2].id),
                Err(Error::Unauthorized)
            ));
            GroupMember::add(&conn, &group, &users[0], users[2].id).unwrap();
            assert!(GroupMember::is_member(&conn, group.id, users[2].id).unwrap());
            Ok(())
        });
    }

    #[test]
    fn owner_cannot_be_removed() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let group = Group::create(&conn, &users[0], "club", &[users[1].id]).unwrap();
            assert!(matches!(
                GroupMember::remove(&conn, &group, &users[0], users[0].id),
                Err(Error::InvalidValue)
            ));
            Ok(())
        });
    }

    #[test]
    fn members_can_leave() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let group = Group::create(&conn, &users[0], "club", &[users[1].id]).unwrap();
            GroupMember::remove(&conn, &group, &users[1], users[1].id).unwrap();
            assert!(!GroupMember::is_member(&conn, group.id, users[1].id).unwrap());
            Ok(())
        });
    }
}
