use shared::{Course, CourseInput};

use crate::http::{ApiClient, ApiResult};

#[derive(Clone, Copy)]
pub struct CoursesApi<'a>(pub(crate) &'a ApiClient);

impl CoursesApi<'_> {
    pub async fn list(self) -> ApiResult<Vec<Course>> {
        self.0.get("/courses").await
    }

    pub async fn get(self, id: i64) -> ApiResult<Course> {
        self.0.get(&format!("/courses/{}", id)).await
    }

    pub async fn create(self, input: &CourseInput) -> ApiResult<Course> {
        self.0.post("/courses", input).await
    }

    pub async fn update(self, id: i64, input: &CourseInput) -> ApiResult<Course> {
        self.0.put(&format!("/courses/{}", id), input).await
    }

    pub async fn delete(self, id: i64) -> ApiResult<()> {
        self.0.delete(&format!("/courses/{}", id)).await
    }
}
