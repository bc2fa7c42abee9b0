//! Administrative commands that bypass the HTTP gates.

use carepoint_core::AppError;
use carepoint_db::UserRepository;
use carepoint_models::{RegisterUserDto, User};

use crate::modules::users::service::UserService;
use crate::validator::validate_request;

/// Creates an admin directly in the store. This is how the first admin comes
/// to exist, since admin creation over HTTP needs an admin session.
pub async fn create_admin(
    users: &dyn UserRepository,
    dto: RegisterUserDto,
) -> Result<User, AppError> {
    validate_request(&dto)?;
    UserService::create_admin(users, dto).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use carepoint_core::{ErrorCode, verify_password};
    use carepoint_db::InMemoryUserRepository;
    use carepoint_models::{Gender, UserRole};
    use chrono::NaiveDate;

    fn admin_dto(email: &str) -> RegisterUserDto {
        RegisterUserDto {
            first_name: Some("Root".to_string()),
            last_name: Some("Admin".to_string()),
            email: Some(email.to_string()),
            phone: Some("03001234567".to_string()),
            nic: Some("3520212345671".to_string()),
            dob: NaiveDate::from_ymd_opt(1985, 1, 1),
            gender: Some(Gender::Male),
            password: Some("admin-pass-1".to_string()),
        }
    }

    #[tokio::test]
    async fn test_create_first_admin() {
        let users = InMemoryUserRepository::new();

        let admin = create_admin(&users, admin_dto("Root@CarePoint.io"))
            .await
            .unwrap();

        assert_eq!(admin.role, UserRole::Admin);
        assert_eq!(admin.email, "root@carepoint.io");

        let hash = users.password_hash("root@carepoint.io").await.unwrap();
        assert!(verify_password("admin-pass-1", &hash).unwrap());
    }

    #[tokio::test]
    async fn test_duplicate_admin_is_rejected() {
        let users = InMemoryUserRepository::new();
        create_admin(&users, admin_dto("root@carepoint.io"))
            .await
            .unwrap();

        let err = create_admin(&users, admin_dto("root@carepoint.io"))
            .await
            .unwrap_err();
        assert!(err.is(ErrorCode::DuplicateEmail));
        assert_eq!(
            err.public_message(),
            "Admin With This Email Already Exists!"
        );
    }

    #[tokio::test]
    async fn test_short_password_is_rejected() {
        let users = InMemoryUserRepository::new();
        let mut dto = admin_dto("root@carepoint.io");
        dto.password = Some("short".to_string());

        let err = create_admin(&users, dto).await.unwrap_err();
        assert!(err.is(ErrorCode::ValidationError));
        assert!(users.is_empty().await);
    }
}
