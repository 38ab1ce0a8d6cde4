//! Short alias generation and collision resolution.
//!
//! Aliases are 6 characters over `[a-zA-Z0-9]`, drawn from the OS CSPRNG.
//! Uniqueness is checked against the store by [`generate_unique_alias`]; the
//! store's unique index remains the final arbiter for concurrent inserts.

use crate::error::AppError;
use regex::Regex;
use serde_json::json;
use std::future::Future;
use std::sync::LazyLock;

/// Symbols an alias is built from.
pub const ALPHABET: &[u8; 62] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of every generated alias.
pub const ALIAS_LENGTH: usize = 6;

/// Largest multiple of 62 that fits in a byte. Bytes at or above it are
/// rejected so that `b % 62` stays uniform.
const REJECTION_BOUND: u8 = 248;

/// Aliases that would shadow fixed routes.
pub const RESERVED_ALIASES: &[&str] = &["health"];

static ALIAS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]{6}$").unwrap_or_else(|e| panic!("invalid alias regex: {e}"))
});

/// Generates one random alias.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random source fails.
pub fn generate_alias() -> Result<String, AppError> {
    let mut alias = String::with_capacity(ALIAS_LENGTH);
    let mut buffer = [0u8; 16];

    while alias.len() < ALIAS_LENGTH {
        getrandom::fill(&mut buffer).map_err(|e| {
            AppError::internal("Random source unavailable", json!({ "reason": e.to_string() }))
        })?;

        for byte in buffer {
            if byte >= REJECTION_BOUND {
                continue;
            }
            alias.push(ALPHABET[(byte % 62) as usize] as char);
            if alias.len() == ALIAS_LENGTH {
                break;
            }
        }
    }

    Ok(alias)
}

/// Checks the shape of an alias taken from a request path.
pub fn is_valid_alias(alias: &str) -> bool {
    ALIAS_RE.is_match(alias)
}

pub fn is_reserved(alias: &str) -> bool {
    RESERVED_ALIASES.contains(&alias)
}

/// Generates an alias not currently held by any live link.
///
/// Calls `exists` once per candidate. Gives up after `max_attempts`
/// candidates.
///
/// # Errors
///
/// - [`AppError::AliasSpaceExhausted`] after `max_attempts` collisions
/// - any error returned by `exists`, unchanged
pub async fn generate_unique_alias<F, Fut>(max_attempts: usize, exists: F) -> Result<String, AppError>
where
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    generate_unique_alias_with(max_attempts, generate_alias, exists).await
}

/// Same as [`generate_unique_alias`] with an injectable candidate source.
pub async fn generate_unique_alias_with<G, F, Fut>(
    max_attempts: usize,
    mut generate: G,
    mut exists: F,
) -> Result<String, AppError>
where
    G: FnMut() -> Result<String, AppError>,
    F: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, AppError>>,
{
    for attempt in 1..=max_attempts {
        let candidate = generate()?;

        // Reserved words burn an attempt without touching the store.
        if is_reserved(&candidate) {
            tracing::debug!(attempt, alias = %candidate, "Generated reserved alias, retrying");
            continue;
        }

        if !exists(candidate.clone()).await? {
            if attempt > 1 {
                tracing::debug!(attempt, "Alias collision resolved");
            }
            return Ok(candidate);
        }

        tracing::debug!(attempt, alias = %candidate, "Alias collision");
    }

    tracing::warn!(attempts = max_attempts, "Alias space exhausted");
    Err(AppError::AliasSpaceExhausted {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_generate_alias_has_correct_length() {
        let alias = generate_alias().unwrap();
        assert_eq!(alias.len(), ALIAS_LENGTH);
    }

    #[test]
    fn test_generate_alias_uses_alphabet_only() {
        for _ in 0..500 {
            let alias = generate_alias().unwrap();
            assert!(alias.bytes().all(|b| ALPHABET.contains(&b)), "{alias}");
            assert!(is_valid_alias(&alias));
        }
    }

    #[test]
    fn test_generate_alias_produces_unique_aliases() {
        let aliases: HashSet<String> = (0..1000).map(|_| generate_alias().unwrap()).collect();
        assert_eq!(aliases.len(), 1000);
    }

    #[test]
    fn test_generate_alias_covers_alphabet() {
        let mut seen = HashSet::new();
        for _ in 0..2000 {
            seen.extend(generate_alias().unwrap().bytes());
        }
        assert_eq!(seen.len(), 62);
    }

    #[test]
    fn test_is_valid_alias() {
        assert!(is_valid_alias("aB3xZ9"));
        assert!(!is_valid_alias("abc"));
        assert!(!is_valid_alias("abcdefg"));
        assert!(!is_valid_alias("abc-12"));
        assert!(!is_valid_alias(""));
    }

    #[tokio::test]
    async fn test_unique_alias_first_candidate_free() {
        let alias = generate_unique_alias(10, |_| async { Ok(false) })
            .await
            .unwrap();
        assert!(is_valid_alias(&alias));
    }

    #[tokio::test]
    async fn test_unique_alias_retries_on_collision() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let alias = generate_unique_alias(10, move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(n < 3) }
        })
        .await
        .unwrap();

        assert_eq!(alias.len(), ALIAS_LENGTH);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_unique_alias_exhausted_after_exact_attempts() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let result = generate_unique_alias(7, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Ok(true) }
        })
        .await;

        assert!(matches!(
            result,
            Err(AppError::AliasSpaceExhausted { attempts: 7 })
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 7);
    }

    #[tokio::test]
    async fn test_unique_alias_propagates_store_error() {
        let result = generate_unique_alias(5, |_| async {
            Err(AppError::internal("Database error", json!({})))
        })
        .await;

        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[tokio::test]
    async fn test_reserved_alias_skipped_without_lookup() {
        let mut candidates = vec!["abc123".to_string(), "health".to_string()];
        let lookups = Arc::new(AtomicUsize::new(0));
        let counter = lookups.clone();

        let alias = generate_unique_alias_with(
            5,
            move || Ok(candidates.pop().unwrap()),
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok(false) }
            },
        )
        .await
        .unwrap();

        assert_eq!(alias, "abc123");
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_attempts_is_exhausted() {
        let result = generate_unique_alias(0, |_| async { Ok(false) }).await;
        assert!(matches!(
            result,
            Err(AppError::AliasSpaceExhausted { attempts: 0 })
        ));
    }
}
