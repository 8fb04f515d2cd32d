use crate::constants::MAX_NAME_LEN;
use crate::error::GurukulError;

pub mod accounts;
pub mod courses;
pub mod students;
pub mod teachers;

pub use accounts::AccountRegistry;
pub use courses::CourseCatalog;
pub use students::StudentRegistry;
pub use teachers::TeacherRegistry;

pub(crate) fn validate_name(field: &'static str, value: &str) -> Result<(), GurukulError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(GurukulError::InvalidField {
            field,
            reason: "cannot be blank".to_string(),
        });
    }
    if value.len() > MAX_NAME_LEN {
        return Err(GurukulError::InvalidField {
            field,
            reason: format!("cannot exceed {} characters", MAX_NAME_LEN),
        });
    }
    // Commas would corrupt the snapshot line.
    if value.contains(',') || value.chars().any(|c| c.is_control()) {
        return Err(GurukulError::InvalidField {
            field,
            reason: "contains invalid characters".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn validate_email(email: &str) -> Result<(), GurukulError> {
    if !email.contains('@') || !email.contains('.') || email.len() < 5 {
        return Err(GurukulError::InvalidEmail(email.to_string()));
    }
    if email
        .chars()
        .any(|c| c == ',' || c.is_whitespace() || c.is_control())
    {
        return Err(GurukulError::InvalidEmail(email.to_string()));
    }
    Ok(())
}
