use kernel::model::instructor::Instructor;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
pub struct InstructorRow {
    pub instructor_id: Uuid,
    pub name: String,
    pub specialties: String,
}

impl From<InstructorRow> for Instructor {
    fn from(value: InstructorRow) -> Self {
        let InstructorRow {
            instructor_id,
            name,
            specialties,
        } = value;
        Instructor {
            instructor_id: instructor_id.into(),
            name,
            specialties,
        }
    }
}
