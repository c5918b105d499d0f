//! Idempotency Key Generation
//!
//! Every `create_transfer` call mints a fresh key; callers cannot supply
//! their own. The generator is injected into the orchestrator so tests can
//! substitute a deterministic one.

use uuid::Uuid;

/// Capability for minting idempotency keys.
pub trait KeyGenerator: Send + Sync {
    /// Produce a key unique across all calls.
    fn generate(&self) -> String;
}

/// UUID v4 backed generator; the production default.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidKeyGenerator;

impl KeyGenerator for UuidKeyGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_keys_are_unique() {
        let keygen = UuidKeyGenerator;
        let keys: HashSet<String> = (0..1000).map(|_| keygen.generate()).collect();
        assert_eq!(keys.len(), 1000);
    }

    #[test]
    fn test_key_is_hyphenated_uuid() {
        let key = UuidKeyGenerator.generate();
        assert_eq!(key.len(), 36);
        assert_eq!(key.matches('-').count(), 4);
        assert!(Uuid::parse_str(&key).is_ok());
    }
}
