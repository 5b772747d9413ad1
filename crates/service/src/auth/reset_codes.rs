use std::time::Duration;

use dashmap::DashMap;
use questline_core::{RESET_CODE_DIGITS, RESET_CODE_TTL_SECS};
use rand::Rng;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct ResetEntry {
    code: String,
    expires_at: Instant,
}

/// In-memory password reset codes keyed by lower-cased email.
///
/// Expired entries are dropped lazily on access and by [`Self::prune_expired`].
/// A new code for the same email replaces the previous one.
#[derive(Debug)]
pub struct ResetCodeCache {
    entries: DashMap<String, ResetEntry>,
    ttl: Duration,
}

impl Default for ResetCodeCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResetCodeCache {
    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Duration::from_secs(RESET_CODE_TTL_SECS))
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { entries: DashMap::new(), ttl }
    }

    /// Generate and store a fresh zero-padded numeric code.
    pub fn issue(&self, email: &str) -> String {
        let upper = 10_u32.pow(RESET_CODE_DIGITS);
        let value = rand::thread_rng().gen_range(0..upper);
        let code = format!("{value:0width$}", width = RESET_CODE_DIGITS as usize);
        self.entries.insert(
            normalize(email),
            ResetEntry { code: code.clone(), expires_at: Instant::now() + self.ttl },
        );
        code
    }

    /// Whether `code` is the current, unexpired code for `email`.
    pub fn verify(&self, email: &str, code: &str) -> bool {
        let key = normalize(email);
        let now = Instant::now();
        // Remove only if still expired, a concurrent `issue` may have replaced it.
        if self.entries.remove_if(&key, |_, entry| entry.expires_at <= now).is_some() {
            return false;
        }
        self.entries.get(&key).is_some_and(|entry| entry.code == code.trim())
    }

    /// Verify and remove in one step; a code can be consumed once.
    pub fn consume(&self, email: &str, code: &str) -> bool {
        let now = Instant::now();
        let code = code.trim();
        self.entries
            .remove_if(&normalize(email), |_, entry| entry.expires_at > now && entry.code == code)
            .is_some()
    }

    /// Drop every expired entry, returning how many were removed.
    pub fn prune_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.expires_at > now);
        before.saturating_sub(self.entries.len())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_shape() {
        let cache = ResetCodeCache::new();
        let code = cache.issue("a@example.com");
        assert_eq!(code.len(), RESET_CODE_DIGITS as usize);
        assert!(code.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_email_key_is_case_insensitive() {
        let cache = ResetCodeCache::new();
        let code = cache.issue("Aria@Example.com");
        assert!(cache.verify("aria@example.com", &code));
        assert!(!cache.verify("aria@example.com", "not-it"));
    }

    #[test]
    fn test_consume_is_single_use() {
        let cache = ResetCodeCache::new();
        let code = cache.issue("a@example.com");
        assert!(cache.consume("a@example.com", &code));
        assert!(!cache.consume("a@example.com", &code));
        assert!(!cache.verify("a@example.com", &code));
    }

    #[test]
    fn test_reissue_replaces_previous_code() {
        let cache = ResetCodeCache::new();
        let first = cache.issue("a@example.com");
        let mut second = cache.issue("a@example.com");
        while second == first {
            second = cache.issue("a@example.com");
        }
        assert!(!cache.verify("a@example.com", &first));
        assert!(cache.verify("a@example.com", &second));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_codes_expire_after_ttl() {
        let cache = ResetCodeCache::with_ttl(Duration::from_secs(600));
        let code = cache.issue("a@example.com");

        tokio::time::advance(Duration::from_secs(599)).await;
        assert!(cache.verify("a@example.com", &code));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(!cache.verify("a@example.com", &code));
        assert!(cache.is_empty(), "expired entry is dropped on access");
    }

    #[tokio::test(start_paused = true)]
    async fn test_prune_expired() {
        let cache = ResetCodeCache::with_ttl(Duration::from_secs(10));
        cache.issue("old@example.com");
        tokio::time::advance(Duration::from_secs(11)).await;
        cache.issue("new@example.com");

        assert_eq!(cache.prune_expired(), 1);
        assert_eq!(cache.len(), 1);
    }
}
