use crate::model::id::InstructorId;

#[derive(Debug, Clone)]
pub struct Instructor {
    pub instructor_id: InstructorId,
    pub name: String,
    /// Comma-separated free text, e.g. "yoga, pilates".
    pub specialties: String,
}
