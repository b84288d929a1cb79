use shared::{Parent, ParentInput};

use super::optional;
use crate::http::{ApiClient, ApiResult};

#[derive(Clone, Copy)]
pub struct ParentsApi<'a>(pub(crate) &'a ApiClient);

impl ParentsApi<'_> {
    pub async fn list(self) -> ApiResult<Vec<Parent>> {
        self.0.get("/parents").await
    }

    pub async fn get(self, id: i64) -> ApiResult<Parent> {
        self.0.get(&format!("/parents/{}", id)).await
    }

    pub async fn by_user(self, user_id: i64) -> ApiResult<Option<Parent>> {
        optional(self.0.get(&format!("/parents/user/{}", user_id)).await)
    }

    pub async fn by_student(self, student_id: i64) -> ApiResult<Vec<Parent>> {
        self.0.get(&format!("/parents/student/{}", student_id)).await
    }

    pub async fn by_classroom(self, classroom_id: i64) -> ApiResult<Vec<Parent>> {
        self.0.get(&format!("/parents/classroom/{}", classroom_id)).await
    }

    pub async fn generate_registration_code(self) -> ApiResult<String> {
        self.0.get("/parents/generateRegCode").await
    }

    pub async fn create(self, input: &ParentInput) -> ApiResult<Parent> {
        self.0.post("/parents", input).await
    }

    pub async fn update(self, id: i64, input: &ParentInput) -> ApiResult<Parent> {
        self.0.put(&format!("/parents/{}", id), input).await
    }

    pub async fn delete(self, id: i64) -> ApiResult<()> {
        self.0.delete(&format!("/parents/{}", id)).await
    }
}
