use carepoint_auth::cookies::{ADMIN_COOKIE, DOCTOR_COOKIE, PATIENT_COOKIE};
use carepoint_core::ErrorResponse;
use carepoint_models::{
    AdminCreatedResponse, AuthResponse, DoctorAvatar, DoctorCreatedResponse, DoctorsResponse,
    Gender, LoginRequest, MessageResponse, RegisterDoctorDto, RegisterUserDto, User, UserResponse,
    UserRole,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register_patient,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::get_admin_details,
        crate::modules::auth::controller::get_patient_details,
        crate::modules::auth::controller::get_doctor_details,
        crate::modules::auth::controller::logout_admin,
        crate::modules::auth::controller::logout_patient,
        crate::modules::auth::controller::logout_doctor,
        crate::modules::users::controller::add_new_admin,
        crate::modules::users::controller::add_new_doctor,
        crate::modules::users::controller::get_all_doctors,
    ),
    components(
        schemas(
            User,
            UserRole,
            Gender,
            DoctorAvatar,
            RegisterUserDto,
            RegisterDoctorDto,
            LoginRequest,
            AuthResponse,
            MessageResponse,
            UserResponse,
            AdminCreatedResponse,
            DoctorCreatedResponse,
            DoctorsResponse,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login, logout and session lookup"),
        (name = "Users", description = "Admin and doctor management")
    ),
    info(
        title = "CarePoint API",
        version = "0.1.0",
        description = "Hospital management backend with cookie-based sessions per role.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            for (scheme, cookie) in [
                ("admin_cookie", ADMIN_COOKIE),
                ("patient_cookie", PATIENT_COOKIE),
                ("doctor_cookie", DOCTOR_COOKIE),
            ] {
                components.add_security_scheme(
                    scheme,
                    SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::new(cookie))),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = ApiDoc::openapi();
        let paths: Vec<_> = doc.paths.paths.keys().cloned().collect();

        for path in [
            "/api/v1/user/patient/register",
            "/api/v1/user/login",
            "/api/v1/user/admin/addnew",
            "/api/v1/user/doctor/addnew",
            "/api/v1/user/doctors",
            "/api/v1/user/admin/me",
            "/api/v1/user/patient/logout",
            "/api/v1/user/doctor/logout",
        ] {
            assert!(paths.iter().any(|p| p == path), "{path} is not documented");
        }
    }

    #[test]
    fn test_cookie_security_schemes() {
        let doc = ApiDoc::openapi();
        let schemes = &doc.components.unwrap().security_schemes;

        assert!(schemes.contains_key("admin_cookie"));
        assert!(schemes.contains_key("patient_cookie"));
        assert!(schemes.contains_key("doctor_cookie"));
    }
}
