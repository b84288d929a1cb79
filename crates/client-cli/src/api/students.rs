use shared::{Student, StudentInput};

use super::optional;
use crate::http::{ApiClient, ApiResult};

#[derive(Clone, Copy)]
pub struct StudentsApi<'a>(pub(crate) &'a ApiClient);

impl StudentsApi<'_> {
    pub async fn list(self) -> ApiResult<Vec<Student>> {
        self.0.get("/students").await
    }

    pub async fn get(self, id: i64) -> ApiResult<Student> {
        self.0.get(&format!("/students/{}", id)).await
    }

    pub async fn by_classroom(self, classroom_id: i64) -> ApiResult<Vec<Student>> {
        self.0.get(&format!("/students/classroom/{}", classroom_id)).await
    }

    pub async fn count_by_classroom(self, classroom_id: i64) -> ApiResult<u64> {
        self.0.get(&format!("/students/classroom/{}/count", classroom_id)).await
    }

    /// The student record bound to a user account
    pub async fn by_user(self, user_id: i64) -> ApiResult<Option<Student>> {
        optional(self.0.get(&format!("/students/user/{}", user_id)).await)
    }

    /// The child linked to a parent record
    pub async fn by_parent(self, parent_id: i64) -> ApiResult<Option<Student>> {
        optional(self.0.get(&format!("/students/parent/{}", parent_id)).await)
    }

    pub async fn generate_registration_code(self) -> ApiResult<String> {
        self.0.get("/students/generateRegCode").await
    }

    pub async fn create(self, input: &StudentInput) -> ApiResult<Student> {
        self.0.post("/students", input).await
    }

    pub async fn update(self, id: i64, input: &StudentInput) -> ApiResult<Student> {
        self.0.put(&format!("/students/{}", id), input).await
    }

    pub async fn delete(self, id: i64) -> ApiResult<()> {
        self.0.delete(&format!("/students/{}", id)).await
    }
}
