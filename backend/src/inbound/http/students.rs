//! Student CRUD handlers.
//!
//! ```text
//! POST   /api/v1/students        {"name":"Ada","email":"ada@example.com","age":36}
//! GET    /api/v1/students
//! GET    /api/v1/students/{id}
//! PUT    /api/v1/students/{id}   {"name":"Ada","email":"ada@example.com","age":37}
//! PATCH  /api/v1/students/{id}   same body as PUT
//! DELETE /api/v1/students/{id}
//! ```
//!
//! Bodies are read as raw bytes so an empty body can be told apart from
//! malformed JSON.

use actix_web::{HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::domain::ports::StudentRepositoryError;
use crate::domain::{Error, Student, StudentDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{decode_json_body, parse_student_id, validation_error};

/// Request body for create and update.
///
/// Every field is optional at the decoding stage so validation can name
/// each missing one instead of failing on the first.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct StudentRequest {
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[schema(example = 36)]
    pub age: Option<i64>,
}

impl TryFrom<StudentRequest> for StudentDraft {
    type Error = Error;

    fn try_from(value: StudentRequest) -> Result<Self, Self::Error> {
        StudentDraft::try_from_parts(value.name, value.email, value.age)
            .map_err(|err| validation_error(&err))
    }
}

/// A stored student.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct StudentResponse {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Ada Lovelace")]
    pub name: String,
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[schema(example = 36)]
    pub age: i32,
}

impl From<Student> for StudentResponse {
    fn from(value: Student) -> Self {
        Self {
            id: value.id().get(),
            name: value.name().to_owned(),
            email: value.email().to_owned(),
            age: value.age(),
        }
    }
}

/// Identifier assigned to a newly created student.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct StudentIdResponse {
    #[schema(example = 1)]
    pub id: i64,
}

/// Result of an update.
///
/// `id` carries the number of rows the update affected, which is always 1
/// on success.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct UpdateStudentResponse {
    #[schema(example = 1)]
    pub id: u64,
}

/// Confirmation returned by delete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct DeleteStudentResponse {
    #[schema(example = "student 1 deleted")]
    pub message: String,
}

fn decode_draft(body: &[u8]) -> Result<StudentDraft, Error> {
    let request: StudentRequest = decode_json_body(body)?;
    StudentDraft::try_from(request)
}

fn map_student_repository_error(err: StudentRepositoryError) -> Error {
    match err {
        StudentRepositoryError::NotFound { id } => {
            warn!(student_id = %id, "student not found");
            Error::not_found(format!("student {id} not found"))
        }
        StudentRepositoryError::Connection { .. } | StudentRepositoryError::Query { .. } => {
            error!(error = %err, "student repository failure");
            Error::internal(err.to_string())
        }
    }
}

fn log_rejected(stage: &'static str, err: Error) -> Error {
    warn!(stage, error = %err, "student request rejected");
    err
}

/// Create a student.
#[utoipa::path(
    post,
    path = "/api/v1/students",
    request_body = StudentRequest,
    responses(
        (status = 201, description = "Student created", body = StudentIdResponse),
        (status = 400, description = "Empty body, malformed JSON or failed validation", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["students"],
    operation_id = "createStudent"
)]
#[post("/students")]
pub async fn create_student(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let draft = decode_draft(&body).map_err(|err| log_rejected("create", err))?;
    let id = state
        .students
        .create(&draft)
        .await
        .map_err(map_student_repository_error)?;

    info!(student_id = %id, "student created");
    Ok(HttpResponse::Created().json(StudentIdResponse { id: id.get() }))
}

/// Fetch one student.
#[utoipa::path(
    get,
    path = "/api/v1/students/{id}",
    params(("id" = i64, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Student", body = StudentResponse),
        (status = 400, description = "Identifier is not an integer", body = Error),
        (status = 404, description = "No such student", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["students"],
    operation_id = "getStudent"
)]
#[get("/students/{id}")]
pub async fn get_student(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<StudentResponse>> {
    let id = parse_student_id(&path).map_err(|err| log_rejected("get", err))?;
    let student = state
        .students
        .find_by_id(id)
        .await
        .map_err(map_student_repository_error)?;

    info!(student_id = %id, "student fetched");
    Ok(web::Json(student.into()))
}

/// List every student in identifier order.
#[utoipa::path(
    get,
    path = "/api/v1/students",
    responses(
        (status = 200, description = "All students, possibly empty", body = [StudentResponse]),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["students"],
    operation_id = "listStudents"
)]
#[get("/students")]
pub async fn list_students(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<StudentResponse>>> {
    let students = state
        .students
        .list()
        .await
        .map_err(map_student_repository_error)?;

    info!(count = students.len(), "students listed");
    Ok(web::Json(
        students.into_iter().map(StudentResponse::from).collect(),
    ))
}

async fn apply_update(
    state: &HttpState,
    raw_id: &str,
    body: &[u8],
) -> ApiResult<web::Json<UpdateStudentResponse>> {
    let id = parse_student_id(raw_id).map_err(|err| log_rejected("update", err))?;
    let draft = decode_draft(body).map_err(|err| log_rejected("update", err))?;
    let affected = state
        .students
        .update(id, &draft)
        .await
        .map_err(map_student_repository_error)?;

    info!(student_id = %id, affected, "student updated");
    Ok(web::Json(UpdateStudentResponse { id: affected }))
}

/// Replace a student's name, email and age.
#[utoipa::path(
    put,
    path = "/api/v1/students/{id}",
    params(("id" = i64, Path, description = "Student identifier")),
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Student updated", body = UpdateStudentResponse),
        (status = 400, description = "Invalid identifier or body", body = Error),
        (status = 404, description = "No such student", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["students"],
    operation_id = "updateStudent"
)]
#[put("/students/{id}")]
pub async fn update_student(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<UpdateStudentResponse>> {
    apply_update(&state, &path, &body).await
}

/// Alias of `PUT`; every field is still required.
#[utoipa::path(
    patch,
    path = "/api/v1/students/{id}",
    params(("id" = i64, Path, description = "Student identifier")),
    request_body = StudentRequest,
    responses(
        (status = 200, description = "Student updated", body = UpdateStudentResponse),
        (status = 400, description = "Invalid identifier or body", body = Error),
        (status = 404, description = "No such student", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["students"],
    operation_id = "patchStudent"
)]
#[patch("/students/{id}")]
pub async fn patch_student(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<UpdateStudentResponse>> {
    apply_update(&state, &path, &body).await
}

/// Delete a student.
#[utoipa::path(
    delete,
    path = "/api/v1/students/{id}",
    params(("id" = i64, Path, description = "Student identifier")),
    responses(
        (status = 200, description = "Student deleted", body = DeleteStudentResponse),
        (status = 400, description = "Identifier is not an integer", body = Error),
        (status = 404, description = "No such student", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["students"],
    operation_id = "deleteStudent"
)]
#[delete("/students/{id}")]
pub async fn delete_student(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteStudentResponse>> {
    let id = parse_student_id(&path).map_err(|err| log_rejected("delete", err))?;
    state
        .students
        .delete_by_id(id)
        .await
        .map_err(map_student_repository_error)?;

    info!(student_id = %id, "student deleted");
    Ok(web::Json(DeleteStudentResponse {
        message: format!("student {id} deleted"),
    }))
}

/// Register every student route on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(create_student)
        .service(list_students)
        .service(get_student)
        .service(update_student)
        .service(patch_student)
        .service(delete_student);
}

#[cfg(test)]
#[path = "students_tests.rs"]
mod tests;
