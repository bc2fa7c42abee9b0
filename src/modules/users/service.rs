use carepoint_core::{AppError, ErrorCode, hash_password_blocking};
use carepoint_db::UserRepository;
use carepoint_media::{MediaHost, UploadOptions, is_supported_image};
use carepoint_models::{DoctorAvatar, RegisterUserDto, RegistrationFields, User, UserRole};
use tracing::instrument;

use super::model::DoctorForm;
use crate::metrics::{track_avatar_upload, track_user_created};
use crate::validator::validate_request;

pub const ADMIN_EXISTS: &str = "Admin With This Email Already Exists!";
pub const DOCTOR_EXISTS: &str = "Doctor With This Email Already Exists!";

fn with_duplicate_message(err: AppError, message: &'static str) -> AppError {
    if err.is(ErrorCode::DuplicateEmail) {
        AppError::duplicate_email(message)
    } else {
        err
    }
}

pub struct UserService;

impl UserService {
    pub async fn ensure_email_available(
        users: &dyn UserRepository,
        email: &str,
        duplicate_message: &'static str,
    ) -> Result<(), AppError> {
        match users.find_by_email(email).await? {
            Some(_) => Err(AppError::duplicate_email(duplicate_message)),
            None => Ok(()),
        }
    }

    /// Checks uniqueness, hashes the password and stores the principal.
    /// A unique-constraint race at insert surfaces with `duplicate_message`
    /// too.
    #[instrument(skip(users, registration), fields(email = %registration.email))]
    pub async fn create_user(
        users: &dyn UserRepository,
        registration: RegistrationFields,
        role: UserRole,
        duplicate_message: &'static str,
    ) -> Result<User, AppError> {
        Self::ensure_email_available(users, &registration.email, duplicate_message).await?;

        let password_hash = hash_password_blocking(registration.password.clone()).await?;
        let user = users
            .insert(registration.into_new_user(role, password_hash))
            .await
            .map_err(|e| with_duplicate_message(e, duplicate_message))?;

        track_user_created(role.as_str());
        tracing::info!(user_id = %user.id, role = %role, "User created");

        Ok(user)
    }

    pub async fn create_admin(
        users: &dyn UserRepository,
        dto: RegisterUserDto,
    ) -> Result<User, AppError> {
        let fields = RegistrationFields::try_from(dto)?;
        Self::create_user(users, fields, UserRole::Admin, ADMIN_EXISTS).await
    }

    /// Creates a doctor and hosts the avatar.
    ///
    /// The avatar is uploaded only after every local check has passed. If the
    /// insert then fails, the uploaded asset is destroyed again; a failed
    /// destroy is logged and otherwise ignored.
    #[instrument(skip(users, media, form))]
    pub async fn create_doctor(
        users: &dyn UserRepository,
        media: &dyn MediaHost,
        form: DoctorForm,
    ) -> Result<User, AppError> {
        let avatar = form
            .avatar
            .ok_or_else(|| AppError::incomplete_with("Doctor Avatar Required!"))?;

        if !is_supported_image(&avatar.content_type) {
            return Err(AppError::validation("File Format Not Supported!"));
        }

        let department = form
            .details
            .doctor_department
            .ok_or_else(AppError::incomplete_form)?;
        validate_request(&form.details.details)?;
        let fields = RegistrationFields::try_from(form.details.details)?;

        Self::ensure_email_available(users, &fields.email, DOCTOR_EXISTS).await?;
        let password_hash = hash_password_blocking(fields.password.clone()).await?;

        let uploaded = media
            .upload(avatar, UploadOptions::doctor_avatar())
            .await
            .inspect_err(|_| track_avatar_upload(false))
            .map_err(AppError::avatar_upload_failed)?;
        track_avatar_upload(true);

        let public_id = uploaded.public_id.clone();
        let new_user = fields
            .into_new_user(UserRole::Doctor, password_hash)
            .with_doctor_profile(
                department,
                DoctorAvatar {
                    public_id: uploaded.public_id,
                    url: uploaded.secure_url,
                },
            );

        match users.insert(new_user).await {
            Ok(user) => {
                track_user_created(UserRole::Doctor.as_str());
                tracing::info!(user_id = %user.id, public_id = %public_id, "Doctor created");
                Ok(user)
            }
            Err(err) => {
                if let Err(cleanup) = media.destroy(&public_id).await {
                    tracing::error!(
                        public_id = %public_id,
                        error = %cleanup,
                        "Failed to remove avatar of unsaved doctor"
                    );
                }
                Err(with_duplicate_message(err, DOCTOR_EXISTS))
            }
        }
    }

    pub async fn list_doctors(users: &dyn UserRepository) -> Result<Vec<User>, AppError> {
        users.list_by_role(UserRole::Doctor).await
    }
}
