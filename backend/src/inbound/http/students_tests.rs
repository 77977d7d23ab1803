//! Tests for student HTTP handlers.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test, web};
use rstest::{fixture, rstest};
use serde_json::{Value, json};

use super::*;
use crate::domain::StudentId;
use crate::domain::ports::{MockStudentRepository, StudentRepository};
use crate::outbound::memory::InMemoryStudentRepository;

fn test_app(
    repo: Arc<dyn StudentRepository>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(HttpState::new(repo)))
        .service(web::scope("/api/v1").configure(configure))
}

#[fixture]
fn memory() -> Arc<dyn StudentRepository> {
    Arc::new(InMemoryStudentRepository::new())
}

fn ada() -> Value {
    json!({"name": "Ada", "email": "ada@example.com", "age": 36})
}

fn detail_code(body: &Value) -> Option<&str> {
    body.get("details")?.get("code")?.as_str()
}

#[rstest]
#[actix_web::test]
async fn create_returns_created_with_identifier(memory: Arc<dyn StudentRepository>) {
    let app = actix_test::init_service(test_app(memory)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/students")
        .set_json(ada())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: StudentIdResponse = actix_test::read_body_json(response).await;
    assert_eq!(body, StudentIdResponse { id: 1 });
}

#[rstest]
#[case("", "empty_body")]
#[case("  \n", "empty_body")]
#[case("{\"name\": ", "malformed_json")]
#[case("42", "malformed_json")]
#[actix_web::test]
async fn create_rejects_unusable_bodies(
    memory: Arc<dyn StudentRepository>,
    #[case] body: &'static str,
    #[case] expected_code: &str,
) {
    let app = actix_test::init_service(test_app(memory)).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/students")
        .insert_header(("content-type", "application/json"))
        .set_payload(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(detail_code(&body), Some(expected_code));
}

#[rstest]
#[case(json!({"name": "", "email": "a@b.c", "age": 20}), "name")]
#[case(json!({"name": "Ada", "email": "a@b.c"}), "age")]
#[case(json!({"name": "Ada", "email": "a@b.c", "age": 0}), "age")]
#[case(json!({"name": "Ada", "age": 20}), "email")]
#[actix_web::test]
async fn create_reports_failing_field(
    memory: Arc<dyn StudentRepository>,
    #[case] payload: Value,
    #[case] field: &str,
) {
    let app = actix_test::init_service(test_app(memory.clone())).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/students")
        .set_json(payload)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(detail_code(&body), Some("validation_failed"));
    assert_eq!(body["details"]["fields"][0]["field"], field);
    assert!(memory.list().await.expect("list").is_empty());
}

#[rstest]
#[actix_web::test]
async fn get_returns_stored_fields(memory: Arc<dyn StudentRepository>) {
    let draft = StudentDraft::try_from_parts(
        Some("Ada".to_owned()),
        Some("ada@example.com".to_owned()),
        Some(36),
    )
    .expect("valid draft");
    let id = memory.create(&draft).await.expect("seed");
    let app = actix_test::init_service(test_app(memory)).await;

    let request = actix_test::TestRequest::get()
        .uri(&format!("/api/v1/students/{id}"))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: StudentResponse = actix_test::read_body_json(response).await;
    assert_eq!(
        body,
        StudentResponse {
            id: id.get(),
            name: "Ada".to_owned(),
            email: "ada@example.com".to_owned(),
            age: 36,
        }
    );
}

#[rstest]
#[case::get(actix_test::TestRequest::get())]
#[case::put(actix_test::TestRequest::put().set_json(ada()))]
#[case::patch(actix_test::TestRequest::patch().set_json(ada()))]
#[case::delete(actix_test::TestRequest::delete())]
#[actix_web::test]
async fn non_integer_identifiers_are_rejected(
    memory: Arc<dyn StudentRepository>,
    #[case] request: actix_test::TestRequest,
) {
    let app = actix_test::init_service(test_app(memory)).await;

    let response =
        actix_test::call_service(&app, request.uri("/api/v1/students/abc").to_request()).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(detail_code(&body), Some("invalid_id"));
}

#[rstest]
#[actix_web::test]
async fn get_missing_student_is_not_found(memory: Arc<dyn StudentRepository>) {
    let app = actix_test::init_service(test_app(memory)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/students/999")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "not_found");
}

#[rstest]
#[actix_web::test]
async fn list_on_empty_store_is_empty_array(memory: Arc<dyn StudentRepository>) {
    let app = actix_test::init_service(test_app(memory)).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/students")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body, json!([]));
}

#[rstest]
#[case::put(actix_test::TestRequest::put())]
#[case::patch(actix_test::TestRequest::patch())]
#[actix_web::test]
async fn update_replaces_fields(
    memory: Arc<dyn StudentRepository>,
    #[case] request: actix_test::TestRequest,
) {
    let app = actix_test::init_service(test_app(memory.clone())).await;
    let create = actix_test::TestRequest::post()
        .uri("/api/v1/students")
        .set_json(ada())
        .to_request();
    let created: StudentIdResponse =
        actix_test::call_and_read_body_json(&app, create).await;

    let request = request
        .uri(&format!("/api/v1/students/{}", created.id))
        .set_json(json!({"name": "Ada L.", "email": "ada@lovelace.org", "age": 37}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: UpdateStudentResponse = actix_test::read_body_json(response).await;
    assert_eq!(body, UpdateStudentResponse { id: 1 });
    let stored = memory
        .find_by_id(StudentId::new(created.id))
        .await
        .expect("student exists");
    assert_eq!(stored.name(), "Ada L.");
    assert_eq!(stored.age(), 37);
}

#[rstest]
#[actix_web::test]
async fn update_missing_student_is_not_found(memory: Arc<dyn StudentRepository>) {
    let app = actix_test::init_service(test_app(memory)).await;

    let request = actix_test::TestRequest::put()
        .uri("/api/v1/students/42")
        .set_json(ada())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case::put_empty(actix_test::TestRequest::put(), "", "empty_body")]
#[case::put_blank(actix_test::TestRequest::put(), " \t\n", "empty_body")]
#[case::put_malformed(actix_test::TestRequest::put(), "{\"name\": ", "malformed_json")]
#[case::patch_empty(actix_test::TestRequest::patch(), "", "empty_body")]
#[case::patch_malformed(actix_test::TestRequest::patch(), "[1, ", "malformed_json")]
#[actix_web::test]
async fn update_rejects_unusable_bodies(
    #[case] request: actix_test::TestRequest,
    #[case] body: &'static str,
    #[case] expected_code: &str,
) {
    let mut mock = MockStudentRepository::new();
    mock.expect_update().never();
    let app = actix_test::init_service(test_app(Arc::new(mock))).await;

    let request = request
        .uri("/api/v1/students/1")
        .insert_header(("content-type", "application/json"))
        .set_payload(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(detail_code(&body), Some(expected_code));
}

#[rstest]
#[actix_web::test]
async fn update_validates_before_touching_the_store() {
    let mut mock = MockStudentRepository::new();
    mock.expect_update().never();
    let app = actix_test::init_service(test_app(Arc::new(mock))).await;

    let request = actix_test::TestRequest::put()
        .uri("/api/v1/students/1")
        .set_json(json!({"name": "Ada", "email": "", "age": 36}))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[rstest]
#[actix_web::test]
async fn delete_twice_is_ok_then_not_found(memory: Arc<dyn StudentRepository>) {
    let app = actix_test::init_service(test_app(memory)).await;
    let create = actix_test::TestRequest::post()
        .uri("/api/v1/students")
        .set_json(ada())
        .to_request();
    let created: StudentIdResponse =
        actix_test::call_and_read_body_json(&app, create).await;
    let uri = format!("/api/v1/students/{}", created.id);

    let first = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri(&uri).to_request(),
    )
    .await;
    assert_eq!(first.status(), StatusCode::OK);
    let body: DeleteStudentResponse = actix_test::read_body_json(first).await;
    assert_eq!(body.message, "student 1 deleted");

    let second = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete().uri(&uri).to_request(),
    )
    .await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[case::connection(StudentRepositoryError::connection("pool timed out"))]
#[case::query(StudentRepositoryError::query("disk I/O error"))]
#[actix_web::test]
async fn store_failures_are_redacted_internal_errors(#[case] failure: StudentRepositoryError) {
    let mut mock = MockStudentRepository::new();
    mock.expect_list()
        .times(1)
        .returning(move || Err(failure.clone()));
    let app = actix_test::init_service(test_app(Arc::new(mock))).await;

    let request = actix_test::TestRequest::get()
        .uri("/api/v1/students")
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "internal_error");
    assert_eq!(body["message"], "Internal server error");
    assert!(body.get("details").is_none());
}

#[rstest]
#[actix_web::test]
async fn create_store_failure_is_internal_error() {
    let mut mock = MockStudentRepository::new();
    mock.expect_create()
        .times(1)
        .returning(|_| Err(StudentRepositoryError::query("database is locked")));
    let app = actix_test::init_service(test_app(Arc::new(mock))).await;

    let request = actix_test::TestRequest::post()
        .uri("/api/v1/students")
        .set_json(ada())
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[rstest]
fn not_found_maps_to_not_found_error() {
    let error = map_student_repository_error(StudentRepositoryError::not_found(StudentId::new(3)));

    assert_eq!(error.code(), crate::domain::ErrorCode::NotFound);
    assert_eq!(error.message(), "student 3 not found");
}
