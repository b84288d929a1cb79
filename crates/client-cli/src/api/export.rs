use crate::http::{ApiClient, ApiResult};

/// Spreadsheet downloads
#[derive(Clone, Copy)]
pub struct ExportApi<'a>(pub(crate) &'a ApiClient);

impl ExportApi<'_> {
    pub async fn parents_of_homeroom(self, teacher_id: i64) -> ApiResult<Vec<u8>> {
        self.0
            .download(&format!("/api/export/parents/homeroom-teacher/{}", teacher_id))
            .await
    }

    pub async fn students_of_homeroom(self, teacher_id: i64) -> ApiResult<Vec<u8>> {
        self.0
            .download(&format!("/api/export/students/homeroom-teacher/{}", teacher_id))
            .await
    }

    pub async fn teachers(self) -> ApiResult<Vec<u8>> {
        self.0.download("/api/export/teachers").await
    }
}
