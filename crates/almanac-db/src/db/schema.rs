//! Table definitions for the tables created in `migrations/`.

diesel::table! {
    app_user (id) {
        id -> Uuid,
        email -> Text,
        first_name -> Text,
        last_name -> Text,
        phone_number -> Nullable<Text>,
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    calendar (id) {
        id -> Uuid,
        user_id -> Uuid,
        name -> Text,
        description -> Text,
        color -> Text,
        is_visible -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    event (id) {
        id -> Uuid,
        user_id -> Uuid,
        calendar_id -> Uuid,
        recurrence_id -> Nullable<Uuid>,
        title -> Text,
        description -> Text,
        start_time -> Timestamptz,
        end_time -> Timestamptz,
        color -> Nullable<Text>,
        is_all_day -> Bool,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    recurrence_rule (id) {
        id -> Uuid,
        frequency -> Text,
        monthly_type -> Nullable<Text>,
        interval -> Int4,
        weekdays -> Nullable<Array<Int4>>,
        weekday_ordinal -> Nullable<Int4>,
        end_date -> Nullable<Date>,
        repeat_count -> Nullable<Int4>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    user_session (id) {
        id -> Uuid,
        user_id -> Uuid,
        token_hash -> Text,
        created_at -> Timestamptz,
        expires_at -> Timestamptz,
    }
}

diesel::joinable!(calendar -> app_user (user_id));
diesel::joinable!(event -> app_user (user_id));
diesel::joinable!(event -> calendar (calendar_id));
diesel::joinable!(event -> recurrence_rule (recurrence_id));
diesel::joinable!(user_session -> app_user (user_id));

diesel::allow_tables_to_appear_in_same_query!(
    app_user,
    calendar,
    event,
    recurrence_rule,
    user_session,
);
