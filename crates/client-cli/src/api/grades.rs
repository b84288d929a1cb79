use shared::{BulkEvaluation, Grade, GradeInput, GradeUpdate};

use crate::http::{ApiClient, ApiResult};

#[derive(Clone, Copy)]
pub struct GradesApi<'a>(pub(crate) &'a ApiClient);

impl GradesApi<'_> {
    pub async fn get(self, id: i64) -> ApiResult<Grade> {
        self.0.get(&format!("/api/grades/{}", id)).await
    }

    pub async fn by_student(self, student_id: i64) -> ApiResult<Vec<Grade>> {
        self.0.get(&format!("/api/grades/student/{}", student_id)).await
    }

    pub async fn by_class_course(self, class_course_id: i64) -> ApiResult<Vec<Grade>> {
        self.0.get(&format!("/api/grades/course/{}", class_course_id)).await
    }

    pub async fn create(self, input: &GradeInput) -> ApiResult<Grade> {
        self.0.post("/api/grades", input).await
    }

    pub async fn update(self, id: i64, input: &GradeUpdate) -> ApiResult<Grade> {
        self.0.put(&format!("/api/grades/{}", id), input).await
    }

    pub async fn delete(self, id: i64) -> ApiResult<()> {
        self.0.delete(&format!("/api/grades/{}", id)).await
    }

    /// Grades and absences for one class course on one date. The response
    /// body is ignored.
    pub async fn bulk_create(self, payload: &BulkEvaluation) -> ApiResult<()> {
        self.0.post::<serde_json::Value, _>("/api/grades/bulk", payload).await?;
        Ok(())
    }
}
