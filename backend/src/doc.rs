//! OpenAPI documentation for the REST API.
//!
//! [`ApiDoc`] registers every student and health endpoint together with the
//! request, response and error schemas. Swagger UI serves it in debug builds.

use utoipa::OpenApi;

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::students::{
    DeleteStudentResponse, StudentIdResponse, StudentRequest, StudentResponse,
    UpdateStudentResponse,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Students API",
        description = "CRUD over student records backed by SQLite."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::students::create_student,
        crate::inbound::http::students::list_students,
        crate::inbound::http::students::get_student,
        crate::inbound::http::students::update_student,
        crate::inbound::http::students::patch_student,
        crate::inbound::http::students::delete_student,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        StudentRequest,
        StudentResponse,
        StudentIdResponse,
        UpdateStudentResponse,
        DeleteStudentResponse,
        ProbeStatus,
    )),
    tags(
        (name = "students", description = "Student record management"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
