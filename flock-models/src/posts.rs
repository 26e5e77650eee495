use crate::{
    follows::Follow, friendships::Friendship, medias::Media, post_medias::PostMedia,
    safe_string::SafeString, schema::posts, users::User, Connection, Error, Result,
    ITEMS_PER_PAGE,
};
use chrono::NaiveDateTime;
use diesel::{self, Connection as _, ExpressionMethods, QueryDsl, RunQueryDsl};
use flock_common::media_grid::Layout;
use itertools::Itertools;

pub mod visibility {
    pub const PUBLIC: &str = "public";
    pub const PRIVATE: &str = "private";
    pub const FOLLOWERS: &str = "followers";
    pub const FRIENDS: &str = "friends";

    pub fn is_valid(vis: &str) -> bool {
        matches!(vis, PUBLIC | PRIVATE | FOLLOWERS | FRIENDS)
    }
}

#[derive(Clone, Queryable, Identifiable, Associations, Serialize, AsChangeset)]
#[belongs_to(User, foreign_key = "author_id")]
pub struct Post {
    pub id: i32,
    pub author_id: i32,
    pub content: SafeString,
    pub visibility: String,
    /// Set on reposts. A repost copies content and media instead of linking,
    /// so edits to the original never propagate.
    pub original_post_id: Option<i32>,
    pub boosted: bool,
    pub creation_date: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "posts"]
pub struct NewPost {
    pub author_id: i32,
    pub content: SafeString,
    pub visibility: String,
    pub original_post_id: Option<i32>,
    pub boosted: bool,
}

impl Post {
    get!(posts);
    list_by!(posts, for_author, author_id as i32);
    last!(posts);

    /// Creates a post with its media attachments, in one transaction.
    pub fn create(
        conn: &Connection,
        author: &User,
        content: SafeString,
        vis: &str,
        media_ids: &[i32],
    ) -> Result<Post> {
        if !visibility::is_valid(vis) {
            return Err(Error::InvalidValue);
        }
        conn.transaction(|| {
            diesel::insert_into(posts::table)
                .values(NewPost {
                    author_id: author.id,
                    content,
                    visibility: vis.to_string(),
                    original_post_id: None,
                    boosted: false,
                })
                .execute(conn)?;
            let post = Post::last(conn)?;
            PostMedia::attach_all(conn, post.id, media_ids)?;
            Ok(post)
        })
    }

    /// Share-by-copy: duplicates this post's content and media references
    /// under the reposter's account, pointing back at the original only for
    /// display purposes.
    pub fn repost(&self, conn: &Connection, reposter: &User) -> Result<Post> {
        conn.transaction(|| {
            diesel::insert_into(posts::table)
                .values(NewPost {
                    author_id: reposter.id,
                    content: self.content.clone(),
                    visibility: self.visibility.clone(),
                    original_post_id: Some(self.id),
                    boosted: false,
                })
                .execute(conn)?;
            let copy = Post::last(conn)?;
            let media_ids: Vec<i32> = PostMedia::for_post(conn, self.id)?
                .into_iter()
                .map(|pm| pm.media_id)
                .collect();
            PostMedia::attach_all(conn, copy.id, &media_ids)?;
            Ok(copy)
        })
    }

    pub fn medias(&self, conn: &Connection) -> Result<Vec<Media>> {
        PostMedia::medias_for_post(conn, self.id)
    }

    /// The media grid arrangement for this post, if it has attachments.
    pub fn grid_layout(&self, conn: &Connection) -> Result<Option<Layout>> {
        Ok(Layout::select(PostMedia::for_post(conn, self.id)?.len()))
    }

    pub fn get_author(&self, conn: &Connection) -> Result<User> {
        User::get(conn, self.author_id)
    }

    /// Whether `viewer` may see this post, given its visibility tier.
    pub fn visible_for(&self, conn: &Connection, viewer: &User) -> Result<bool> {
        if self.author_id == viewer.id {
            return Ok(true);
        }
        match self.visibility.as_str() {
            visibility::PUBLIC => Ok(true),
            visibility::PRIVATE => Ok(false),
            visibility::FOLLOWERS => {
                Ok(Follow::find(conn, viewer.id, self.author_id).is_ok())
            }
            visibility::FRIENDS => Friendship::exists(conn, self.author_id, viewer.id),
            _ => Ok(false),
        }
    }

    /// Everything `viewer` may see, most recent first, deduped but not yet
    /// paginated.
    ///
    /// Candidates are gathered per visibility tier and merged in memory; the
    /// candidate sets can overlap (a friend can also be followed), hence the
    /// dedup.
    fn feed_candidates(conn: &Connection, viewer: &User) -> Result<Vec<Post>> {
        let followed = Follow::following_ids(conn, viewer.id)?;
        let friends = Friendship::friend_ids(conn, viewer.id)?;

        let public: Vec<Post> = posts::table
            .filter(posts::visibility.eq(visibility::PUBLIC))
            .order(posts::creation_date.desc())
            .load(conn)?;
        let own: Vec<Post> = posts::table
            .filter(posts::author_id.eq(viewer.id))
            .load(conn)?;
        let followers_tier: Vec<Post> = posts::table
            .filter(posts::visibility.eq(visibility::FOLLOWERS))
            .filter(posts::author_id.eq_any(&followed))
            .load(conn)?;
        let friends_tier: Vec<Post> = posts::table
            .filter(posts::visibility.eq(visibility::FRIENDS))
            .filter(posts::author_id.eq_any(&friends))
            .load(conn)?;

        Ok(public
            .into_iter()
            .chain(own)
            .chain(followers_tier)
            .chain(friends_tier)
            .sorted_by(|a, b| b.creation_date.cmp(&a.creation_date).then(b.id.cmp(&a.id)))
            .unique_by(|p| p.id)
            .collect())
    }

    /// The home feed: everything `viewer` may see, most recent first.
    pub fn feed_for(conn: &Connection, viewer: &User, page: i32) -> Result<Vec<Post>> {
        let offset = ((page - 1) * ITEMS_PER_PAGE) as usize;
        Ok(Post::feed_candidates(conn, viewer)?
            .into_iter()
            .skip(offset)
            .take(ITEMS_PER_PAGE as usize)
            .collect())
    }

    /// The video feed: visible posts whose first attachment is a video.
    /// Filters the whole candidate set before paginating, so a video buried
    /// deep in the home feed still shows up here.
    pub fn video_feed_for(conn: &Connection, viewer: &User, page: i32) -> Result<Vec<Post>> {
        use crate::medias::MediaCategory;
        let candidates = Post::feed_candidates(conn, viewer)?;
        let videos: Vec<Post> = candidates
            .into_iter()
            .filter(|p| {
                p.medias(conn)
                    .map(|medias| {
                        medias
                            .first()
                            .map(|m| m.category() == MediaCategory::Video)
                            .unwrap_or(false)
                    })
                    .unwrap_or(false)
            })
            .collect();
        let offset = ((page - 1) * ITEMS_PER_PAGE) as usize;
        Ok(videos
            .into_iter()
            .skip(offset)
            .take(ITEMS_PER_PAGE as usize)
            .collect())
    }

    /// Posts of one profile that `viewer` may see.
    pub fn for_profile(conn: &Connection, profile: &User, viewer: &User) -> Result<Vec<Post>> {
        let all = posts::table
            .filter(posts::author_id.eq(profile.id))
            .order(posts::creation_date.desc())
            .load::<Post>(conn)?;
        let mut visible = Vec::new();
        for post in all {
            if post.visible_for(conn, viewer)? {
                visible.push(post);
            }
        }
        Ok(visible)
    }

    /// Token-API search, restricted to what the token's owner may see.
    pub fn search(
        conn: &Connection,
        viewer: &User,
        query: &flock_api::posts::PostQuery,
    ) -> Result<Vec<Post>> {
        let mut q = posts::table.into_boxed();
        if let Some(id) = query.id {
            q = q.filter(posts::id.eq(id));
        }
        if let Some(author_id) = query.author_id {
            q = q.filter(posts::author_id.eq(author_id));
        }
        if let Some(ref vis) = query.visibility {
            q = q.filter(posts::visibility.eq(vis.clone()));
        }
        if let Some(boosted) = query.boosted {
            q = q.filter(posts::boosted.eq(boosted));
        }
        let all = q.order(posts::creation_date.desc()).load::<Post>(conn)?;

        let mut visible = Vec::new();
        for post in all {
            if post.visible_for(conn, viewer)? {
                visible.push(post);
            }
        }
        let offset = ((query.page.unwrap_or(1) - 1) * ITEMS_PER_PAGE) as usize;
        Ok(visible
            .into_iter()
            .skip(offset)
            .take(ITEMS_PER_PAGE as usize)
            .collect())
    }

    pub fn boosted_posts(conn: &Connection) -> Result<Vec<Post>> {
        posts::table
            .filter(posts::boosted.eq(true))
            .order(posts::creation_date.desc())
            .load(conn)
            .map_err(Error::from)
    }

    /// Admin tool: pin this post to the top of discovery surfaces.
    pub fn set_boosted(&self, conn: &Connection, boosted: bool) -> Result<()> {
        diesel::update(self)
            .set(posts::boosted.eq(boosted))
            .execute(conn)
            .map(|_| ())
            .map_err(Error::from)
    }

    pub fn count_likes(&self, conn: &Connection) -> Result<i64> {
        crate::likes::Like::count_for_subject(conn, self.id, crate::likes::like_target::POST)
    }

    /// Deletes the post with its comments, likes and media links.
    pub fn delete(&self, conn: &Connection) -> Result<()> {
        use crate::schema::{comments, likes};
        conn.transaction(|| {
            diesel::delete(comments::table.filter(comments::post_id.eq(self.id)))
                .execute(conn)?;
            diesel::delete(
                likes::table
                    .filter(likes::subject_id.eq(self.id))
                    .filter(likes::subject_kind.ne(crate::likes::like_target::COMMENT)),
            )
            .execute(conn)?;
            PostMedia::delete_for_post(conn, self.id)?;
            diesel::delete(self).execute(conn)?;
            Ok(())
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{tests::db, users::tests::fill_database};
    use diesel::Connection as _;

    /// One public post by admin, one friends-tier post by "user", one
    /// followers-tier post by "other".
    pub(crate) fn fill_posts(conn: &Connection, users: &[User]) -> Vec<Post> {
        let public = Post::create(
            conn,
            &users[0],
            SafeString::new("Hello world"),
            visibility::PUBLIC,
            &[],
        )
        .unwrap();
        let friends_only = Post::create(
            conn,
            &users[1],
            SafeString::new("Just for friends"),
            visibility::FRIENDS,
            &[],
        )
        .unwrap();
        let followers_only = Post::create(
            conn,
            &users[2],
            SafeString::new("For my followers"),
            visibility::FOLLOWERS,
            &[],
        )
        .unwrap();
        vec![public, friends_only, followers_only]
    }

    #[test]
    fn visibility_tiers() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);

            // public post: everyone
            assert!(posts[0].visible_for(&conn, &users[2]).unwrap());

            // friends-tier: only after a friendship exists
            assert!(!posts[1].visible_for(&conn, &users[2]).unwrap());
            Friendship::connect(&conn, users[1].id, users[2].id).unwrap();
            assert!(posts[1].visible_for(&conn, &users[2]).unwrap());

            // followers-tier: only for followers
            assert!(!posts[2].visible_for(&conn, &users[1]).unwrap());
            Follow::create(&conn, &users[1], &users[2]).unwrap();
            assert!(posts[2].visible_for(&conn, &users[1]).unwrap());

            // own posts are always visible
            assert!(posts[1].visible_for(&conn, &users[1]).unwrap());
            Ok(())
        });
    }

    #[test]
    fn private_posts_stay_private() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let secret = Post::create(
                &conn,
                &users[1],
                SafeString::new("drafts"),
                visibility::PRIVATE,
                &[],
            )
            .unwrap();
            Friendship::connect(&conn, users[1].id, users[2].id).unwrap();
            assert!(!secret.visible_for(&conn, &users[2]).unwrap());
            assert!(secret.visible_for(&conn, &users[1]).unwrap());
            Ok(())
        });
    }

    #[test]
    fn feed_respects_tiers_and_dedups() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);

            let feed = Post::feed_for(&conn, &users[2], 1).unwrap();
            let ids: Vec<i32> = feed.iter().map(|p| p.id).collect();
            assert!(ids.contains(&posts[0].id)); // public
            assert!(ids.contains(&posts[2].id)); // own
            assert!(!ids.contains(&posts[1].id)); // friends-only, not friends yet

            // being both friend and follower must not duplicate entries
            Friendship::connect(&conn, users[1].id, users[2].id).unwrap();
            Follow::create(&conn, &users[2], &users[1]).unwrap();
            let feed = Post::feed_for(&conn, &users[2], 1).unwrap();
            let matching = feed.iter().filter(|p| p.id == posts[1].id).count();
            assert_eq!(matching, 1);
            Ok(())
        });
    }

    #[test]
    fn video_feed_reaches_past_the_first_page() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            use crate::medias::NewMedia;

            let users = fill_database(&conn);
            let clip = Media::insert(
                &conn,
                NewMedia {
                    file_path: format!("{}/clip.mp4", crate::CONFIG.media_directory),
                    alt_text: "a clip".to_owned(),
                    owner_id: users[0].id,
                },
            )
            .unwrap();
            let video_post = Post::create(
                &conn,
                &users[0],
                SafeString::new("watch this"),
                visibility::PUBLIC,
                &[clip.id],
            )
            .unwrap();
            // enough newer posts to push the video off the first feed page
            for i in 0..ITEMS_PER_PAGE {
                Post::create(
                    &conn,
                    &users[0],
                    SafeString::new(&format!("filler {}", i)),
                    visibility::PUBLIC,
                    &[],
                )
                .unwrap();
            }

            let feed = Post::feed_for(&conn, &users[1], 1).unwrap();
            assert!(feed.iter().all(|p| p.id != video_post.id));

            let videos = Post::video_feed_for(&conn, &users[1], 1).unwrap();
            assert_eq!(videos.len(), 1);
            assert_eq!(videos[0].id, video_post.id);
            Ok(())
        });
    }

    #[test]
    fn repost_copies_instead_of_linking() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);

            let copy = posts[0].repost(&conn, &users[1]).unwrap();
            assert_eq!(copy.author_id, users[1].id);
            assert_eq!(copy.original_post_id, Some(posts[0].id));
            assert_eq!(copy.content, posts[0].content);

            // editing the original does not touch the copy
            diesel::update(&posts[0])
                .set(posts::content.eq(SafeString::new("edited")))
                .execute(&*conn)
                .unwrap();
            let copy = Post::get(&conn, copy.id).unwrap();
            assert_eq!(copy.content.get(), "Hello world");
            Ok(())
        });
    }

    #[test]
    fn boost_flag() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);

            posts[0].set_boosted(&conn, true).unwrap();
            let boosted = Post::boosted_posts(&conn).unwrap();
            assert_eq!(boosted.len(), 1);
            assert_eq!(boosted[0].id, posts[0].id);

            posts[0].set_boosted(&conn, false).unwrap();
            assert!(Post::boosted_posts(&conn).unwrap().is_empty());
            Ok(())
        });
    }

    #[test]
    fn delete_cleans_up() {
        let conn = db();
        conn.test_transaction::<_, (), _>(|| {
            use crate::comments::{Comment, NewComment};
            use crate::likes::{like_target, Like};

            let users = fill_database(&conn);
            let posts = fill_posts(&conn, &users);
            Comment::insert(
                &conn,
                NewComment {
                    post_id: posts[0].id,
                    author_id: users[1].id,
                    content: SafeString::new("hi"),
                    parent_comment_id: None,
                },
            )
            .unwrap();
            Like::toggle(&conn, &users[1], posts[0].id, like_target::POST).unwrap();

            posts[0].delete(&conn).unwrap();
            assert!(Post::get(&conn, posts[0].id).is_err());
            assert_eq!(
                Like::count_for_subject(&conn, posts[0].id, like_target::POST).unwrap(),
                0
            );
            assert!(Comment::for_post(&conn, posts[0].id).unwrap().is_empty());
            Ok(())
        });
    }
}
