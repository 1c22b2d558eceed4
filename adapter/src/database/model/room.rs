use kernel::model::room::Room;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct RoomRow {
    pub room_id: Uuid,
    pub name: String,
    pub capacity: i32,
}

impl From<RoomRow> for Room {
    fn from(value: RoomRow) -> Self {
        let RoomRow {
            room_id,
            name,
            capacity,
        } = value;
        Room {
            room_id: room_id.into(),
            name,
            capacity,
        }
    }
}
