//! Question identifier generation.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Length of a question identifier.
pub const QUESTION_TOKEN_LEN: usize = 12;

/// Generate a fresh 12-character alphanumeric question token.
///
/// Tokens are not guaranteed unique on their own: the question store checks
/// each candidate against existing rows and regenerates on collision.
pub fn question_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(QUESTION_TOKEN_LEN)
        .map(char::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_length() {
        assert_eq!(question_token().len(), QUESTION_TOKEN_LEN);
    }

    #[test]
    fn test_token_is_alphanumeric() {
        let token = question_token();
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()), "{}", token);
    }

    #[test]
    fn test_tokens_vary() {
        let a: Vec<String> = (0..16).map(|_| question_token()).collect();
        let distinct: std::collections::HashSet<&String> = a.iter().collect();
        assert!(distinct.len() > 1);
    }
}
