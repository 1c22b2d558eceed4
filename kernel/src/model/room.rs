use crate::model::id::RoomId;

#[derive(Debug, Clone)]
pub struct Room {
    pub room_id: RoomId,
    pub name: String,
    /// Physical capacity of the room itself. Each session carries its own
    /// booking capacity, which may be lower for equipment-bound classes.
    pub capacity: i32,
}
