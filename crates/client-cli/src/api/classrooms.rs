use shared::{Classroom, ClassroomInput};

use super::optional;
use crate::http::{ApiClient, ApiResult};

#[derive(Clone, Copy)]
pub struct ClassroomsApi<'a>(pub(crate) &'a ApiClient);

impl ClassroomsApi<'_> {
    pub async fn list(self) -> ApiResult<Vec<Classroom>> {
        self.0.get("/classrooms").await
    }

    pub async fn get(self, id: i64) -> ApiResult<Classroom> {
        self.0.get(&format!("/classrooms/{}", id)).await
    }

    /// The classroom this teacher is homeroom teacher of, if any
    pub async fn by_homeroom_teacher(self, teacher_id: i64) -> ApiResult<Option<Classroom>> {
        optional(self.0.get::<Option<Classroom>>(&format!("/classrooms/teacher/{}", teacher_id)).await)
            .map(Option::flatten)
    }

    pub async fn create(self, input: &ClassroomInput) -> ApiResult<Classroom> {
        self.0.post("/classrooms", input).await
    }

    pub async fn update(self, id: i64, input: &ClassroomInput) -> ApiResult<Classroom> {
        self.0.put(&format!("/classrooms/{}", id), input).await
    }

    pub async fn delete(self, id: i64) -> ApiResult<()> {
        self.0.delete(&format!("/classrooms/{}", id)).await
    }
}
