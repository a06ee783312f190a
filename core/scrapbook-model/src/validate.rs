use crate::ValidationError;

/// Upper bound on title-like text fields, in characters.
pub const MAX_TEXT_LEN: usize = 200;

pub(crate) fn require_text(field: &str, value: &str) -> Result<(), ValidationError> {
    let len = value.chars().count();
    if len == 0 {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    if len > MAX_TEXT_LEN {
        return Err(ValidationError::new(
            field,
            format!("must be at most {MAX_TEXT_LEN} characters (got {len})"),
        ));
    }
    Ok(())
}

pub(crate) fn require_url(field: &str, value: &str) -> Result<(), ValidationError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ValidationError::new(field, format!("must be an absolute URL: {e}")))
}

pub(crate) fn require_finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::new(field, "must be a finite number"))
    }
}
