//! Staff creation forms.

use carepoint_media::AvatarFile;
use carepoint_models::RegisterDoctorDto;

/// Largest accepted `multipart/form-data` body for doctor creation.
pub const MAX_DOCTOR_FORM_BYTES: usize = 5 * 1024 * 1024;

/// Multipart field carrying the avatar image.
pub const AVATAR_FIELD: &str = "docAvatar";

/// A doctor creation request after multipart decoding. `avatar` is `None`
/// when the `docAvatar` part is absent or empty.
#[derive(Debug, Clone, Default)]
pub struct DoctorForm {
    pub details: RegisterDoctorDto,
    pub avatar: Option<AvatarFile>,
}
