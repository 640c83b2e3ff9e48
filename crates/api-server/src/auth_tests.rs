#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::AppError;
    use axum::http::StatusCode;

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("abcd1234efgh5678"), "abcd...5678");
    }

    #[test]
    fn test_mask_short_token() {
        assert_eq!(mask_token("short"), "****");
    }

    #[test]
    fn test_mask_token_multibyte() {
        assert_eq!(mask_token("çãçãxxxxçãçã"), "çãçã...çãçã");
    }

    #[test]
    fn test_empty_allowlist_is_open() {
        let tokens = TokenAllowlist::default();
        assert!(tokens.is_empty());
        assert_eq!(tokens.verify(None), Ok(()));
        assert_eq!(tokens.verify(Some("")), Ok(()));
        assert_eq!(tokens.verify(Some("anything")), Ok(()));
    }

    #[test]
    fn test_blank_entries_do_not_enable_auth() {
        let tokens = TokenAllowlist::new(["", ""]);
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_missing_token() {
        let tokens = TokenAllowlist::new(["secret-1"]);
        assert_eq!(tokens.verify(None), Err(AuthError::MissingToken));
        assert_eq!(tokens.verify(Some("")), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_invalid_token() {
        let tokens = TokenAllowlist::new(["secret-1", "secret-2"]);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens.verify(Some("secret-3")), Err(AuthError::InvalidToken));
        assert_eq!(tokens.verify(Some("SECRET-1")), Err(AuthError::InvalidToken));
        assert_eq!(tokens.verify(Some(" secret-1")), Err(AuthError::InvalidToken));
    }

    #[test]
    fn test_valid_token() {
        let tokens = TokenAllowlist::new(vec!["secret-1".to_string(), "secret-2".to_string()]);
        assert_eq!(tokens.verify(Some("secret-1")), Ok(()));
        assert_eq!(tokens.verify(Some("secret-2")), Ok(()));
    }

    #[test]
    fn test_auth_errors_map_to_unauthorized() {
        for err in [AuthError::MissingToken, AuthError::InvalidToken] {
            let app_err = AppError::from(err);
            assert_eq!(app_err.status, StatusCode::UNAUTHORIZED);
            assert_eq!(app_err.message, "unauthorized");
        }
    }

    #[test]
    fn test_hash_key_is_hex_sha256() {
        let digest = hash_key("secret");
        assert_eq!(digest.len(), 64);
        assert_ne!(digest, "secret");
        assert_eq!(digest, hash_key("secret"));
    }
}
