use shared::{Absence, AbsenceInput};

use crate::http::{ApiClient, ApiResult};

#[derive(Clone, Copy)]
pub struct AbsencesApi<'a>(pub(crate) &'a ApiClient);

impl AbsencesApi<'_> {
    pub async fn get(self, id: i64) -> ApiResult<Absence> {
        self.0.get(&format!("/api/absences/{}", id)).await
    }

    pub async fn by_class_course(self, class_course_id: i64) -> ApiResult<Vec<Absence>> {
        self.0.get(&format!("/api/absences/course/{}", class_course_id)).await
    }

    pub async fn total_for_student(self, student_id: i64) -> ApiResult<u64> {
        self.0.get(&format!("/api/absences/student/{}/total", student_id)).await
    }

    pub async fn unexcused_for_student(self, student_id: i64) -> ApiResult<u64> {
        self.0.get(&format!("/api/absences/student/{}/unexcused", student_id)).await
    }

    pub async fn create(self, input: &AbsenceInput) -> ApiResult<Absence> {
        self.0.post("/api/absences", input).await
    }

    /// `date` is in backend `DD-MM-YYYY` form; both values travel in the query
    pub async fn update(self, id: i64, date: &str, excused: bool) -> ApiResult<Option<Absence>> {
        self.0
            .put_query(
                &format!("/api/absences/{}", id),
                &[("date", date.to_string()), ("excused", excused.to_string())],
            )
            .await
    }

    pub async fn toggle_excused(self, id: i64) -> ApiResult<Option<Absence>> {
        self.0.put_query(&format!("/api/absences/{}/toggle-excused", id), &[]).await
    }

    pub async fn delete(self, id: i64) -> ApiResult<()> {
        self.0.delete(&format!("/api/absences/{}", id)).await
    }
}
