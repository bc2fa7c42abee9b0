use axum::{
    Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use carepoint_core::{AppError, ErrorResponse};
use carepoint_media::AvatarFile;
use carepoint_models::{
    AdminCreatedResponse, DoctorCreatedResponse, DoctorsResponse, RegisterDoctorDto,
    RegisterUserDto,
};
use serde_json::{Map, Value};
use tracing::instrument;

use super::model::{AVATAR_FIELD, DoctorForm};
use super::service::UserService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::validation("File Too Large!")
    } else {
        tracing::debug!(error = %err.body_text(), "Unreadable multipart body");
        AppError::validation("Invalid Form Data!")
    }
}

/// Splits the multipart body into the avatar file and the text fields, then
/// reads the text fields through the same deserializer as JSON bodies.
async fn read_doctor_form(mut multipart: Multipart) -> Result<DoctorForm, AppError> {
    let mut text_fields = Map::new();
    let mut avatar = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };

        if name == AVATAR_FIELD {
            let file_name = field.file_name().unwrap_or("avatar").to_owned();
            let content_type = field.content_type().unwrap_or_default().to_owned();
            let bytes = field.bytes().await.map_err(multipart_error)?;

            if !bytes.is_empty() {
                avatar = Some(AvatarFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
        } else {
            let value = field.text().await.map_err(multipart_error)?;
            text_fields.insert(name, Value::String(value));
        }
    }

    let details: RegisterDoctorDto =
        serde_json::from_value(Value::Object(text_fields)).map_err(|e| {
            tracing::debug!(error = %e, "Doctor form has invalid field values");
            AppError::validation("Invalid field value in request")
        })?;

    Ok(DoctorForm { details, avatar })
}

/// Create an admin
#[utoipa::path(
    post,
    path = "/api/v1/user/admin/addnew",
    request_body = RegisterUserDto,
    responses(
        (status = 200, description = "Admin created", body = AdminCreatedResponse),
        (status = 400, description = "Incomplete form, invalid field or email taken", body = ErrorResponse),
        (status = 401, description = "No valid admin session", body = ErrorResponse),
        (status = 403, description = "Session does not belong to an admin", body = ErrorResponse),
    ),
    security(("admin_cookie" = [])),
    tag = "Users"
)]
#[instrument(skip(state, dto))]
pub async fn add_new_admin(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<RegisterUserDto>,
) -> Result<Json<AdminCreatedResponse>, AppError> {
    let admin = UserService::create_admin(state.users.as_ref(), dto).await?;

    Ok(Json(AdminCreatedResponse {
        success: true,
        message: "New Admin Registered".to_string(),
        admin,
    }))
}

/// Create a doctor with an avatar
///
/// Takes `multipart/form-data` with the registration fields, `doctorDepartment`
/// and the image part `docAvatar` (PNG, JPEG or WebP).
#[utoipa::path(
    post,
    path = "/api/v1/user/doctor/addnew",
    request_body(content = RegisterDoctorDto, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Doctor created", body = DoctorCreatedResponse),
        (status = 400, description = "Missing avatar, unsupported file, incomplete form or email taken", body = ErrorResponse),
        (status = 401, description = "No valid admin session", body = ErrorResponse),
        (status = 403, description = "Session does not belong to an admin", body = ErrorResponse),
        (status = 500, description = "Avatar upload failed", body = ErrorResponse),
    ),
    security(("admin_cookie" = [])),
    tag = "Users"
)]
#[instrument(skip(state, multipart))]
pub async fn add_new_doctor(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<DoctorCreatedResponse>, AppError> {
    let Ok(multipart) = multipart else {
        return Err(AppError::incomplete_with("Doctor Avatar Required!"));
    };

    let form = read_doctor_form(multipart).await?;
    let doctor =
        UserService::create_doctor(state.users.as_ref(), state.media.as_ref(), form).await?;

    Ok(Json(DoctorCreatedResponse {
        success: true,
        message: "New Doctor Registered".to_string(),
        doctor,
    }))
}

/// List all doctors
#[utoipa::path(
    get,
    path = "/api/v1/user/doctors",
    responses(
        (status = 200, description = "Every doctor", body = DoctorsResponse),
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_all_doctors(
    State(state): State<AppState>,
) -> Result<Json<DoctorsResponse>, AppError> {
    let doctors = UserService::list_doctors(state.users.as_ref()).await?;

    Ok(Json(DoctorsResponse {
        success: true,
        doctors,
    }))
}
