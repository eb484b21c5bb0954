use crate::error::{Error, Result};

const MAX_NAME_LEN: usize = 100;
const MAX_CODENAME_LEN: usize = 64;

pub fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(Error::BadRequest(format!("{field} is required")));
    }
    Ok(())
}

pub fn validate_device_name(name: &str) -> Result<()> {
    require(name, "Device name")?;
    if name.len() > MAX_NAME_LEN {
        return Err(Error::BadRequest(format!(
            "Device name cannot exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Codenames appear in URLs, so only URL-safe slugs are accepted.
pub fn validate_codename(codename: &str) -> Result<()> {
    if codename.is_empty() {
        return Err(Error::BadRequest("Codename is required".into()));
    }
    if codename.len() > MAX_CODENAME_LEN {
        return Err(Error::BadRequest(format!(
            "Codename cannot exceed {MAX_CODENAME_LEN} characters"
        )));
    }
    if !codename
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(Error::BadRequest(
            "Codename can only contain alphanumeric characters, hyphens, and underscores".into(),
        ));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<()> {
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(Error::BadRequest("A valid email address is required".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codename_rules() {
        assert!(validate_codename("panther").is_ok());
        assert!(validate_codename("sm-g991_b").is_ok());
        assert!(validate_codename("").is_err());
        assert!(validate_codename("pixel 7").is_err());
        assert!(validate_codename("a/b").is_err());
        assert!(validate_codename(&"x".repeat(65)).is_err());
    }

    #[test]
    fn test_email_rules() {
        assert!(validate_email("dev@sleepos.org").is_ok());
        assert!(validate_email("dev@localhost").is_err());
        assert!(validate_email("@sleepos.org").is_err());
        assert!(validate_email("nobody").is_err());
    }

    #[test]
    fn test_require_rejects_blank() {
        assert!(matches!(require("  ", "Version"), Err(Error::BadRequest(m)) if m == "Version is required"));
    }
}
