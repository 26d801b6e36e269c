use crate::errors::ModelError;

pub(crate) const NAME_MAX: usize = 128;
pub(crate) const EMAIL_MAX: usize = 255;

pub(crate) fn require_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    if name.chars().count() > NAME_MAX {
        return Err(ModelError::Validation(format!("name longer than {NAME_MAX} characters")));
    }
    Ok(())
}

pub(crate) fn require_email(email: &str) -> Result<(), ModelError> {
    let trimmed = email.trim();
    if trimmed.is_empty() || !trimmed.contains('@') {
        return Err(ModelError::Validation("invalid email".into()));
    }
    if trimmed.chars().count() > EMAIL_MAX {
        return Err(ModelError::Validation(format!("email longer than {EMAIL_MAX} characters")));
    }
    Ok(())
}
