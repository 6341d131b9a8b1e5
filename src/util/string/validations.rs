use email_address::EmailAddress;

use crate::util::file_store::FileStore;

pub const USER_NAME_MAX_CHARS: usize = 50;
pub const EMAIL_MAX_CHARS: usize = 255;
pub const URL_MAX_CHARS: usize = 512;
pub const PASSWORD_MIN_CHARS: usize = 8;
pub const FULL_NAME_MAX_CHARS: usize = 100;
pub const BIO_MAX_CHARS: usize = 300;

#[inline(always)]
pub fn validate_username(user_name: &str) -> bool {
    let trimmed = user_name.trim();
    !trimmed.is_empty() && trimmed == user_name && user_name.chars().count() <= USER_NAME_MAX_CHARS
}

#[inline(always)]
pub fn validate_email(user_email: &str) -> bool {
    user_email.chars().count() <= EMAIL_MAX_CHARS && EmailAddress::is_valid(user_email)
}

#[inline(always)]
pub fn validate_password_form(password: &str) -> bool {
    password.chars().count() >= PASSWORD_MIN_CHARS
}

/// `None` is always within bounds.
#[inline(always)]
pub fn within_chars(value: Option<&str>, max: usize) -> bool {
    value.is_none_or(|v| v.chars().count() <= max)
}

/// Upload paths are handed out by the file store only. A client may resend
/// the value a row already holds, but never point a row at some other upload.
#[inline(always)]
pub fn may_reference_image(new: Option<&str>, current: Option<&str>) -> bool {
    new.is_none_or(|path| !FileStore::is_managed(path) || Some(path) == current)
}
