use almanac_core::model::User;

use crate::model::user::UserRecord;

impl From<UserRecord> for User {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            email: record.email,
            first_name: record.first_name,
            last_name: record.last_name,
            phone_number: record.phone_number,
            created_at: record.created_at,
        }
    }
}
