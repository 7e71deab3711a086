use std::collections::HashMap;
use std::sync::RwLock;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;

use millbook_core::{EntityId, TenantId};

use super::r#trait::{
    Collection, CommitOutcome, DocKey, LedgerStore, StoreError, StoredEntry, Version,
    VersionGuard, Write,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
struct DocAddress {
    tenant_id: TenantId,
    collection: Collection,
    id: EntityId,
}

impl DocAddress {
    fn new(tenant_id: TenantId, key: &DocKey) -> Self {
        Self {
            tenant_id,
            collection: key.collection,
            id: key.id,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredDoc {
    doc: JsonValue,
    version: Version,
    recorded_at: DateTime<Utc>,
}

/// In-memory versioned document store.
///
/// Intended for tests/dev. Guard validation and batch application happen
/// under one write lock, which is what makes each commit atomic.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    docs: RwLock<HashMap<DocAddress, StoredDoc>>,
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_tenant_doc(tenant_id: TenantId, write: &Write) -> Result<(), StoreError> {
        let expected = JsonValue::String(tenant_id.to_string());
        match write.doc().get("org_id") {
            Some(v) if *v == expected => Ok(()),
            _ => Err(StoreError::TenantIsolation(format!(
                "document {} does not belong to the committing tenant",
                write.key()
            ))),
        }
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn get(
        &self,
        tenant_id: TenantId,
        key: &DocKey,
    ) -> Result<(Option<JsonValue>, Version), StoreError> {
        let docs = self
            .docs
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;

        match docs.get(&DocAddress::new(tenant_id, key)) {
            Some(stored) => Ok((Some(stored.doc.clone()), stored.version)),
            None => Ok((None, Version::ABSENT)),
        }
    }

    fn commit(
        &self,
        tenant_id: TenantId,
        guards: &[VersionGuard],
        writes: Vec<Write>,
    ) -> Result<CommitOutcome, StoreError> {
        let mut docs = self
            .docs
            .write()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;

        // Validate every guard before touching anything.
        for guard in guards {
            let current = docs
                .get(&DocAddress::new(tenant_id, &guard.key))
                .map(|stored| stored.version)
                .unwrap_or(Version::ABSENT);
            if current != guard.version {
                return Err(StoreError::Conflict {
                    collection: guard.key.collection,
                    id: guard.key.id,
                    expected: guard.version,
                    found: current,
                });
            }
        }

        // Validate the writes: tenant ownership, and no blind overwrites.
        for write in &writes {
            Self::ensure_tenant_doc(tenant_id, write)?;

            let exists = docs.contains_key(&DocAddress::new(tenant_id, write.key()));
            match write {
                Write::Put { key, .. } => {
                    let guarded = guards.iter().any(|g| g.key == *key);
                    if exists && !guarded {
                        return Err(StoreError::UnguardedWrite {
                            collection: key.collection,
                            id: key.id,
                        });
                    }
                }
                Write::Insert { key, .. } => {
                    if exists {
                        return Err(StoreError::Internal(format!(
                            "insert collided with existing document {key}"
                        )));
                    }
                }
            }
        }

        // Apply the whole batch under one timestamp.
        let committed_at = Utc::now();
        for write in writes {
            let address = DocAddress::new(tenant_id, write.key());
            let version = docs
                .get(&address)
                .map(|stored| stored.version.next())
                .unwrap_or(Version(1));
            let doc = match write {
                Write::Put { doc, .. } => doc,
                Write::Insert { doc, .. } => doc,
            };
            docs.insert(
                address,
                StoredDoc {
                    doc,
                    version,
                    recorded_at: committed_at,
                },
            );
        }

        Ok(CommitOutcome { committed_at })
    }

    fn list(
        &self,
        tenant_id: TenantId,
        collection: Collection,
    ) -> Result<Vec<StoredEntry>, StoreError> {
        let docs = self
            .docs
            .read()
            .map_err(|_| StoreError::Internal("lock poisoned".to_string()))?;

        let mut entries: Vec<StoredEntry> = docs
            .iter()
            .filter(|(address, _)| {
                address.tenant_id == tenant_id && address.collection == collection
            })
            .map(|(address, stored)| StoredEntry {
                id: address.id,
                doc: stored.doc.clone(),
                version: stored.version,
                recorded_at: stored.recorded_at,
            })
            .collect();

        // Commit order; ids are time-ordered so they break timestamp ties.
        entries.sort_by(|a, b| {
            a.recorded_at
                .cmp(&b.recorded_at)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });

        Ok(entries)
    }
}
