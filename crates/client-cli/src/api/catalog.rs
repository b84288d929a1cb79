use shared::{ClassroomCatalog, CourseCatalog};

use crate::http::{ApiClient, ApiResult};

#[derive(Clone, Copy)]
pub struct CatalogApi<'a>(pub(crate) &'a ApiClient);

impl CatalogApi<'_> {
    pub async fn classroom(self, classroom_id: i64) -> ApiResult<ClassroomCatalog> {
        self.0.get(&format!("/api/catalog/classroom/{}", classroom_id)).await
    }

    pub async fn course(self, classroom_id: i64, class_course_id: i64) -> ApiResult<CourseCatalog> {
        self.0
            .get(&format!("/api/catalog/classroom/{}/course/{}", classroom_id, class_course_id))
            .await
    }
}
