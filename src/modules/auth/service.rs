use carepoint_core::{AppError, verify_dummy_password, verify_password_blocking};
use carepoint_db::UserRepository;
use carepoint_models::{LoginRequest, RegisterUserDto, RegistrationFields, User, UserRole};
use tracing::instrument;

use crate::metrics::{track_user_login_failure, track_user_login_success};
use crate::modules::users::service::UserService;

pub const PATIENT_EXISTS: &str = "User already Registered!";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(users, dto))]
    pub async fn register_patient(
        users: &dyn UserRepository,
        dto: RegisterUserDto,
    ) -> Result<User, AppError> {
        let registration = RegistrationFields::try_from(dto)?;
        UserService::create_user(users, registration, UserRole::Patient, PATIENT_EXISTS).await
    }

    /// Checks email, password and role, in that order.
    ///
    /// An unknown email, a wrong password and an unusable stored hash all
    /// fail identically. Only a correct password with the wrong role is told
    /// apart, as `RoleMismatch`.
    #[instrument(skip(users, dto), fields(email = ?dto.email, role = ?dto.role))]
    pub async fn login(users: &dyn UserRepository, dto: LoginRequest) -> Result<User, AppError> {
        let LoginRequest {
            email: Some(email),
            password: Some(password),
            role: Some(role),
        } = dto
        else {
            return Err(AppError::incomplete_form());
        };

        let Some(credentials) = users.find_credentials_by_email(&email).await? else {
            verify_dummy_password(password).await;
            track_user_login_failure("unknown_email");
            return Err(AppError::invalid_credentials());
        };

        match verify_password_blocking(password, credentials.password_hash).await {
            Ok(true) => {}
            Ok(false) => {
                track_user_login_failure("wrong_password");
                return Err(AppError::invalid_credentials());
            }
            Err(err) => {
                tracing::error!(
                    user_id = %credentials.user.id,
                    error = ?err.error,
                    "Stored password hash could not be verified"
                );
                track_user_login_failure("unusable_hash");
                return Err(AppError::invalid_credentials());
            }
        }

        if credentials.user.role != role {
            track_user_login_failure("role_mismatch");
            return Err(AppError::role_mismatch());
        }

        track_user_login_success(role.as_str());
        Ok(credentials.user)
    }
}
