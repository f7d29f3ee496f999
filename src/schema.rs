table! {
    history (id) {
        id -> Integer,
        media_id -> Integer,
        title -> Text,
        thumb_type -> Integer,
        time -> BigInt,
    }
}

table! {
    tags (id) {
        id -> Integer,
        name -> Text,
        tag_type -> Integer,
        count -> Integer,
        status -> Integer,
    }
}

allow_tables_to_appear_in_same_query!(history, tags,);
