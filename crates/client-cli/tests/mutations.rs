mod common;

use axum::http::{Method, StatusCode};
use common::{logged_in, Backend, Canned};
use schoolbook::forms::{build_evaluation, EvaluationRow, GradeForm};
use serde_json::json;
use shared::{ClassroomInput, CourseInput, StudentInput};

fn admin_backend(backend: &Backend) {
    backend
        .get("/classrooms", json!([{"id": 3, "name": "12A"}]))
        .get("/students", json!([]))
        .get("/teachers", json!([]))
        .get("/parents", json!([]))
        .get("/courses", json!([{"id": 4, "name": "Fizică"}]))
        .get("/class-courses", json!([]));
}

/// Teacher 42 teaches class course 11 in 12A and is homeroom teacher of 9B
fn teacher_backend(backend: &Backend) {
    backend
        .get("/teachers/user/5", json!({"id": 42, "firstName": "Ion", "lastName": "Popescu"}))
        .get(
            "/class-courses/teacher/42",
            json!([{"id": 11, "classroom": {"id": 3, "name": "12A"}, "course": {"id": 4, "name": "Fizică"}}]),
        )
        .get("/classrooms/teacher/42", json!({"id": 7, "name": "9B"}))
        .get("/students/classroom/3", json!([]))
        .get("/students/classroom/7", json!([]))
        .get("/parents/classroom/3", json!([]))
        .get("/parents/classroom/7", json!([]))
        .get("/courses", json!([]));
}

#[tokio::test]
async fn test_create_then_delete_patches_cache() {
    let backend = Backend::start().await;
    admin_backend(&backend);
    backend
        .route(
            Method::POST,
            "/students",
            Canned::json(json!({"id": 100, "firstName": "Andrei", "lastName": "Pop", "classroom": {"id": 3, "name": "12A"}})),
        )
        .route(Method::DELETE, "/students/100", Canned::empty());

    let (_, ctx) = logged_in(&backend.url, "director", None, "ADMIN");
    ctx.refresh().await;
    backend.clear_log();

    let input = StudentInput {
        first_name: "Andrei".to_string(),
        last_name: "Pop".to_string(),
        registration_code: "STU-1".to_string(),
        classroom_id: 3,
    };
    let outcome = ctx.add_student(&input).await;
    assert!(outcome.is_success());
    assert_eq!(outcome.data.map(|s| s.id), Some(100));

    let state = ctx.snapshot().await;
    assert_eq!(state.students.len(), 1);
    assert_eq!(state.students_in(3), 1);
    // Patched in place, no reload
    assert_eq!(backend.paths(), vec!["/students"]);

    let outcome = ctx.delete_student(100).await;
    assert!(outcome.is_success());
    assert!(ctx.snapshot().await.students.is_empty());
}

#[tokio::test]
async fn test_update_replaces_by_id() {
    let backend = Backend::start().await;
    admin_backend(&backend);
    backend.route(
        Method::PUT,
        "/courses/4",
        Canned::json(json!({"id": 4, "name": "Fizică aplicată"})),
    );

    let (_, ctx) = logged_in(&backend.url, "director", None, "ADMIN");
    ctx.refresh().await;

    let outcome = ctx
        .update_course(4, &CourseInput { name: "Fizică aplicată".to_string() })
        .await;
    assert!(outcome.is_success());

    let state = ctx.snapshot().await;
    assert_eq!(state.courses.len(), 1);
    assert_eq!(state.courses[0].name, "Fizică aplicată");
}

#[tokio::test]
async fn test_failed_write_leaves_cache_and_reports_message() {
    let backend = Backend::start().await;
    admin_backend(&backend);
    backend.route(
        Method::POST,
        "/classrooms",
        Canned::json(json!({"message": "Classroom name already exists"})).status(StatusCode::BAD_REQUEST),
    );

    let (_, ctx) = logged_in(&backend.url, "director", None, "ADMIN");
    ctx.refresh().await;

    let outcome = ctx
        .add_classroom(&ClassroomInput { name: "12A".to_string(), level: Some(12), homeroom_teacher_id: None })
        .await;
    assert!(!outcome.is_success());
    assert_eq!(outcome.error.as_deref(), Some("Classroom name already exists"));
    assert_eq!(ctx.snapshot().await.classrooms.len(), 1);
}

#[tokio::test]
async fn test_backend_grade_rejection_shown_verbatim() {
    let backend = Backend::start().await;
    admin_backend(&backend);
    backend.route(
        Method::POST,
        "/api/grades",
        Canned::json(json!({"message": "Grade must be between 1 and 10"})).status(StatusCode::BAD_REQUEST),
    );

    let (_, ctx) = logged_in(&backend.url, "director", None, "ADMIN");
    let form = GradeForm {
        student_id: Some(100),
        class_course_id: Some(11),
        value: "10".to_string(),
        date: "2024-10-12".to_string(),
    };
    let outcome = ctx.add_grade(&form.validate().unwrap()).await;
    assert_eq!(outcome.error.as_deref(), Some("Grade must be between 1 and 10"));

    let sent = &backend.requests_to(Method::POST, "/api/grades")[0];
    assert_eq!(
        sent.body,
        Some(json!({"studentId": 100, "classCourseId": 11, "value": 10, "date": "12-10-2024"}))
    );
}

#[tokio::test]
async fn test_grade_write_reloads_scope() {
    let backend = Backend::start().await;
    admin_backend(&backend);
    backend.route(
        Method::POST,
        "/api/grades",
        Canned::json(json!({"id": 1, "studentId": 100, "classCourseId": 11, "value": 9, "date": "12-10-2024"})),
    );

    let (_, ctx) = logged_in(&backend.url, "director", None, "ADMIN");
    ctx.refresh().await;
    backend.clear_log();

    let form = GradeForm {
        student_id: Some(100),
        class_course_id: Some(11),
        value: "9".to_string(),
        date: "2024-10-12".to_string(),
    };
    assert!(ctx.add_grade(&form.validate().unwrap()).await.is_success());

    let paths = backend.paths();
    assert_eq!(paths[0], "/api/grades");
    assert!(paths.iter().any(|p| p == "/classrooms"));
}

#[tokio::test]
async fn test_bulk_evaluation_omits_blank_rows() {
    let backend = Backend::start().await;
    backend.route(Method::POST, "/api/grades/bulk", Canned::json(json!({"created": 2})));

    teacher_backend(&backend);

    let (_, ctx) = logged_in(&backend.url, "popescu", Some(5), "TEACHER");
    assert!(ctx.refresh().await);
    let rows = vec![
        EvaluationRow { student_id: 100, grade: Some("8".to_string()), absent: false },
        EvaluationRow { student_id: 101, grade: None, absent: true },
        EvaluationRow { student_id: 102, grade: None, absent: false },
    ];
    let payload = build_evaluation(11, "2024-09-16", &rows).unwrap();
    assert!(ctx.bulk_evaluate(&payload).await.is_success());

    let sent = &backend.requests_to(Method::POST, "/api/grades/bulk")[0];
    assert_eq!(
        sent.body,
        Some(json!({
            "classCourseId": 11,
            "date": "16-09-2024",
            "entries": [
                {"studentId": 100, "grade": 8},
                {"studentId": 101, "absent": true}
            ]
        }))
    );
}

#[tokio::test]
async fn test_empty_bulk_evaluation_is_not_sent() {
    let backend = Backend::start().await;
    let (_, ctx) = logged_in(&backend.url, "popescu", Some(5), "TEACHER");

    let payload = build_evaluation(11, "2024-09-16", &[]).unwrap();
    let outcome = ctx.bulk_evaluate(&payload).await;
    assert!(!outcome.is_success());
    assert!(backend.log().is_empty());
}

#[tokio::test]
async fn test_absence_excuse_travels_in_query() {
    let backend = Backend::start().await;
    backend.route(
        Method::PUT,
        "/api/absences/6",
        Canned::json(json!({"id": 6, "date": "03-10-2024", "excused": true})),
    );

    let (_, ctx) = logged_in(&backend.url, "popescu", Some(5), "TEACHER");
    let outcome = ctx.update_absence(6, "03-10-2024", true).await;
    assert!(outcome.is_success());
    assert_eq!(outcome.data.flatten().map(|a| a.excused), Some(true));

    let sent = backend
        .log()
        .into_iter()
        .find(|l| l.method == Method::PUT)
        .unwrap();
    assert_eq!(sent.query.as_deref(), Some("date=03-10-2024&excused=true"));
    assert_eq!(sent.body, None);
}

#[tokio::test]
async fn test_class_details_and_catalog() {
    let backend = Backend::start().await;
    backend
        .get("/classrooms/3", json!({"id": 3, "name": "12A", "level": 12}))
        .get(
            "/students/classroom/3",
            json!([{"id": 100, "firstName": "Andrei", "lastName": "Pop"}]),
        )
        .get(
            "/api/catalog/classroom/3",
            json!({
                "classroomId": 3,
                "classroomName": "12A",
                "courses": [{"classCourseId": 11, "courseName": "Fizică"}],
                "students": [{"studentId": 100, "studentName": "Andrei Pop", "courses": []}]
            }),
        );

    let (_, ctx) = logged_in(&backend.url, "director", None, "ADMIN");

    let (classroom, students) = ctx.class_details(3).await.unwrap();
    assert_eq!(classroom.name, "12A");
    assert_eq!(students.len(), 1);

    let catalog = ctx.classroom_catalog(3).await.unwrap();
    assert_eq!(catalog.courses.len(), 1);
    assert_eq!(catalog.students[0].student_name, "Andrei Pop");

    assert!(ctx.class_details(99).await.is_none());
}

#[tokio::test]
async fn test_teacher_records_only_in_own_classes() {
    let backend = Backend::start().await;
    teacher_backend(&backend);
    backend
        .get("/class-courses/20", json!({"id": 20, "classroomId": 7}))
        .get("/class-courses/30", json!({"id": 30, "classroomId": 9}))
        .route(
            Method::POST,
            "/api/absences",
            Canned::json(json!({"id": 6, "date": "03-10-2024", "excused": false})),
        );

    let (_, ctx) = logged_in(&backend.url, "popescu", Some(5), "TEACHER");
    assert!(ctx.refresh().await);
    backend.clear_log();

    assert!(ctx.may_record(11).await);
    // Taught by a colleague, but in the homeroom class
    assert!(ctx.may_record(20).await);
    assert!(!ctx.may_record(30).await);

    let form = GradeForm {
        student_id: Some(100),
        class_course_id: Some(30),
        value: "9".to_string(),
        date: "2024-10-12".to_string(),
    };
    let outcome = ctx.add_grade(&form.validate().unwrap()).await;
    assert!(!outcome.is_success());
    assert!(outcome.error.unwrap().contains("classes you teach"));

    let rows = vec![EvaluationRow { student_id: 100, grade: Some("7".to_string()), absent: false }];
    let payload = build_evaluation(30, "2024-10-12", &rows).unwrap();
    assert!(!ctx.bulk_evaluate(&payload).await.is_success());

    let absence = shared::AbsenceInput {
        student_id: 100,
        class_course_id: 20,
        date: "03-10-2024".to_string(),
        excused: false,
    };
    assert!(ctx.add_absence(&absence).await.is_success());

    // Nothing outside the teacher's scope reached a write endpoint
    assert!(backend.requests_to(Method::POST, "/api/grades").is_empty());
    assert!(backend.requests_to(Method::POST, "/api/grades/bulk").is_empty());
    assert_eq!(backend.requests_to(Method::POST, "/api/absences").len(), 1);
}

#[tokio::test]
async fn test_pupil_roles_cannot_record() {
    let backend = Backend::start().await;
    let (_, ctx) = logged_in(&backend.url, "elev", Some(8), "STUDENT");
    assert!(!ctx.may_record(11).await);
    assert!(backend.log().is_empty());
}
