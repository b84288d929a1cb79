use shared::{ClassCourse, ClassCourseInput};

use crate::http::{ApiClient, ApiResult};

#[derive(Clone, Copy)]
pub struct ClassCoursesApi<'a>(pub(crate) &'a ApiClient);

impl ClassCoursesApi<'_> {
    pub async fn list(self) -> ApiResult<Vec<ClassCourse>> {
        self.0.get("/class-courses").await
    }

    pub async fn get(self, id: i64) -> ApiResult<ClassCourse> {
        self.0.get(&format!("/class-courses/{}", id)).await
    }

    pub async fn by_classroom(self, classroom_id: i64) -> ApiResult<Vec<ClassCourse>> {
        self.0.get(&format!("/class-courses/classroom/{}", classroom_id)).await
    }

    pub async fn by_teacher(self, teacher_id: i64) -> ApiResult<Vec<ClassCourse>> {
        self.0.get(&format!("/class-courses/teacher/{}", teacher_id)).await
    }

    pub async fn create(self, input: &ClassCourseInput) -> ApiResult<ClassCourse> {
        self.0.post("/class-courses", input).await
    }

    pub async fn update(self, id: i64, input: &ClassCourseInput) -> ApiResult<ClassCourse> {
        self.0.put(&format!("/class-courses/{}", id), input).await
    }

    pub async fn delete(self, id: i64) -> ApiResult<()> {
        self.0.delete(&format!("/class-courses/{}", id)).await
    }
}
