//! Page cache invalidation.
//!
//! Server actions call [`CacheInvalidator::invalidate`] after a successful
//! write. Clients poll the revision of their page key and refetch when it moves.
//! Revisions are kept per tenant: a write in one organization never makes
//! another organization's clients refetch.

use std::collections::HashMap;
use std::sync::Mutex;

pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self, tenant_id: &str, page_key: &str);
}

/// Monotonic revision counter per `(tenant, page key)`. Unknown pairs are at revision 0.
#[derive(Debug, Default)]
pub struct RevisionRegistry {
    revisions: Mutex<HashMap<(String, String), u64>>,
}

impl RevisionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn revision(&self, tenant_id: &str, page_key: &str) -> u64 {
        let revisions = self.revisions.lock().unwrap_or_else(|e| e.into_inner());
        revisions
            .get(&(tenant_id.to_string(), page_key.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

impl CacheInvalidator for RevisionRegistry {
    fn invalidate(&self, tenant_id: &str, page_key: &str) {
        let mut revisions = self.revisions.lock().unwrap_or_else(|e| e.into_inner());
        let revision = revisions
            .entry((tenant_id.to_string(), page_key.to_string()))
            .or_insert(0);
        *revision += 1;
        tracing::debug!(
            "Invalidated {} of tenant {} -> revision {}",
            page_key,
            tenant_id,
            revision
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revisions_increase_per_key() {
        let registry = RevisionRegistry::new();
        assert_eq!(registry.revision("tenant-a", "a001_invoice"), 0);

        registry.invalidate("tenant-a", "a001_invoice");
        registry.invalidate("tenant-a", "a001_invoice");
        registry.invalidate("tenant-a", "other");

        assert_eq!(registry.revision("tenant-a", "a001_invoice"), 2);
        assert_eq!(registry.revision("tenant-a", "other"), 1);
    }

    #[test]
    fn test_revisions_are_per_tenant() {
        let registry = RevisionRegistry::new();
        registry.invalidate("tenant-a", "a001_invoice");

        assert_eq!(registry.revision("tenant-a", "a001_invoice"), 1);
        assert_eq!(registry.revision("tenant-b", "a001_invoice"), 0);
    }
}
