diesel::table! {
    repositories (id) {
        id -> Text,
        stars -> Nullable<BigInt>,
        forks -> Nullable<BigInt>,
        watchers -> Nullable<BigInt>,
    }
}

diesel::table! {
    stars (repo_id, user_id) {
        repo_id -> Text,
        user_id -> Text,
    }
}

diesel::table! {
    users (id) {
        id -> Text,
        name -> Nullable<Text>,
        company -> Nullable<Text>,
        blog -> Nullable<Text>,
        location -> Nullable<Text>,
        email -> Nullable<Text>,
        bio -> Nullable<Text>,
        twitter_username -> Nullable<Text>,
        public_repos -> Nullable<BigInt>,
        public_gists -> Nullable<BigInt>,
        followers -> Nullable<BigInt>,
        following -> Nullable<BigInt>,
        created_at -> Nullable<Text>,
    }
}

diesel::joinable!(stars -> repositories (repo_id));

diesel::allow_tables_to_appear_in_same_query!(
    repositories,
    stars,
    users,
);
