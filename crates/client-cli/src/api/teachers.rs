use shared::{Teacher, TeacherInput};

use super::optional;
use crate::http::{ApiClient, ApiResult};

#[derive(Clone, Copy)]
pub struct TeachersApi<'a>(pub(crate) &'a ApiClient);

impl TeachersApi<'_> {
    pub async fn list(self) -> ApiResult<Vec<Teacher>> {
        self.0.get("/teachers").await
    }

    pub async fn get(self, id: i64) -> ApiResult<Teacher> {
        self.0.get(&format!("/teachers/{}", id)).await
    }

    pub async fn by_user(self, user_id: i64) -> ApiResult<Option<Teacher>> {
        optional(self.0.get(&format!("/teachers/user/{}", user_id)).await)
    }

    pub async fn generate_registration_code(self) -> ApiResult<String> {
        self.0.get("/teachers/generateRegCode").await
    }

    pub async fn create(self, input: &TeacherInput) -> ApiResult<Teacher> {
        self.0.post("/teachers", input).await
    }

    pub async fn update(self, id: i64, input: &TeacherInput) -> ApiResult<Teacher> {
        self.0.put(&format!("/teachers/{}", id), input).await
    }

    pub async fn delete(self, id: i64) -> ApiResult<()> {
        self.0.delete(&format!("/teachers/{}", id)).await
    }
}
