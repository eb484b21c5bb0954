#[derive(Debug, PartialEq, Eq)]
pub enum TokenExtractError {
    InvalidScheme,
    EmptyToken,
}

/// Extracts the token from an `Authorization: Bearer <token>` header.
/// Returns None if no auth header is present.
pub fn extract_token_from_header(
    auth_header: Option<&str>,
) -> Result<Option<String>, TokenExtractError> {
    let Some(header) = auth_header else {
        return Ok(None);
    };

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(TokenExtractError::InvalidScheme)?
        .trim();

    if token.is_empty() {
        return Err(TokenExtractError::EmptyToken);
    }
    Ok(Some(token.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(
            extract_token_from_header(Some("Bearer sleepos_abc_def")),
            Ok(Some("sleepos_abc_def".to_string()))
        );
    }

    #[test]
    fn test_missing_header() {
        assert_eq!(extract_token_from_header(None), Ok(None));
    }

    #[test]
    fn test_other_scheme() {
        assert_eq!(
            extract_token_from_header(Some("Basic dXNlcjpwYXNz")),
            Err(TokenExtractError::InvalidScheme)
        );
    }

    #[test]
    fn test_empty_bearer() {
        assert_eq!(
            extract_token_from_header(Some("Bearer   ")),
            Err(TokenExtractError::EmptyToken)
        );
    }
}
