table! {
    api_tokens (id) {
        id -> Int4,
        creation_date -> Timestamp,
        value -> Text,
        scopes -> Text,
        user_id -> Int4,
    }
}

table! {
    comments (id) {
        id -> Int4,
        post_id -> Int4,
        author_id -> Int4,
        content -> Text,
        parent_comment_id -> Nullable<Int4>,
        creation_date -> Timestamp,
    }
}

table! {
    follows (id) {
        id -> Int4,
        follower_id -> Int4,
        following_id -> Int4,
        creation_date -> Timestamp,
    }
}

table! {
    friend_requests (id) {
        id -> Int4,
        sender_id -> Int4,
        receiver_id -> Int4,
        status -> Varchar,
        creation_date -> Timestamp,
    }
}

table! {
    friendships (id) {
        id -> Int4,
        friend_1_id -> Int4,
        friend_2_id -> Int4,
        creation_date -> Timestamp,
    }
}

table! {
    group_members (id) {
        id -> Int4,
        group_id -> Int4,
        user_id -> Int4,
        is_admin -> Bool,
        creation_date -> Timestamp,
    }
}

table! {
    group_messages (id) {
        id -> Int4,
        group_id -> Int4,
        sender_id -> Int4,
        content -> Text,
        audio_id -> Nullable<Int4>,
        creation_date -> Timestamp,
    }
}

table! {
    groups (id) {
        id -> Int4,
        name -> Varchar,
        owner_id -> Int4,
        creation_date -> Timestamp,
    }
}

table! {
    likes (id) {
        id -> Int4,
        user_id -> Int4,
        subject_id -> Int4,
        subject_kind -> Varchar,
        creation_date -> Timestamp,
    }
}

table! {
    live_streams (id) {
        id -> Int4,
        host_id -> Int4,
        title -> Varchar,
        started_at -> Timestamp,
        ended_at -> Nullable<Timestamp>,
    }
}

table! {
    medias (id) {
        id -> Int4,
        file_path -> Text,
        alt_text -> Text,
        owner_id -> Int4,
    }
}

table! {
    messages (id) {
        id -> Int4,
        sender_id -> Int4,
        receiver_id -> Int4,
        content -> Text,
        audio_id -> Nullable<Int4>,
        read -> Bool,
        creation_date -> Timestamp,
    }
}

table! {
    notifications (id) {
        id -> Int4,
        user_id -> Int4,
        kind -> Varchar,
        object_id -> Int4,
        read -> Bool,
        creation_date -> Timestamp,
    }
}

table! {
    password_reset_requests (id) {
        id -> Int4,
        email -> Varchar,
        token -> Varchar,
        expiration_date -> Timestamp,
    }
}

table! {
    post_medias (id) {
        id -> Int4,
        post_id -> Int4,
        media_id -> Int4,
        position -> Int4,
    }
}

table! {
    posts (id) {
        id -> Int4,
        author_id -> Int4,
        content -> Text,
        visibility -> Varchar,
        original_post_id -> Nullable<Int4>,
        boosted -> Bool,
        creation_date -> Timestamp,
    }
}

table! {
    reports (id) {
        id -> Int4,
        reporter_id -> Int4,
        reported_id -> Int4,
        kind -> Varchar,
        reason -> Text,
        creation_date -> Timestamp,
    }
}

table! {
    stories (id) {
        id -> Int4,
        user_id -> Int4,
        media_id -> Nullable<Int4>,
        body -> Nullable<Text>,
        expires_at -> Timestamp,
        creation_date -> Timestamp,
    }
}

table! {
    stream_viewers (id) {
        id -> Int4,
        stream_id -> Int4,
        user_id -> Int4,
        joined_at -> Timestamp,
    }
}

table! {
    users (id) {
        id -> Int4,
        username -> Varchar,
        display_name -> Varchar,
        email -> Varchar,
        hashed_password -> Varchar,
        bio -> Text,
        avatar_id -> Nullable<Int4>,
        banner_id -> Nullable<Int4>,
        is_private -> Bool,
        is_verified -> Bool,
        badge_tier -> Varchar,
        role -> Int4,
        creation_date -> Timestamp,
    }
}

table! {
    verification_requests (id) {
        id -> Int4,
        user_id -> Int4,
        status -> Varchar,
        creation_date -> Timestamp,
    }
}

joinable!(api_tokens -> users (user_id));
joinable!(comments -> posts (post_id));
joinable!(comments -> users (author_id));
joinable!(group_members -> groups (group_id));
joinable!(group_members -> users (user_id));
joinable!(group_messages -> groups (group_id));
joinable!(group_messages -> users (sender_id));
joinable!(groups -> users (owner_id));
joinable!(likes -> users (user_id));
joinable!(live_streams -> users (host_id));
joinable!(medias -> users (owner_id));
joinable!(notifications -> users (user_id));
joinable!(post_medias -> medias (media_id));
joinable!(post_medias -> posts (post_id));
joinable!(posts -> users (author_id));
joinable!(stories -> users (user_id));
joinable!(stream_viewers -> live_streams (stream_id));
joinable!(stream_viewers -> users (user_id));
joinable!(verification_requests -> users (user_id));

allow_tables_to_appear_in_same_query!(
    api_tokens,
    comments,
    follows,
    friend_requests,
    friendships,
    group_members,
    group_messages,
    groups,
    likes,
    live_streams,
    medias,
    messages,
    notifications,
    password_reset_requests,
    post_medias,
    posts,
    reports,
    stories,
    stream_viewers,
    users,
    verification_requests,
);
