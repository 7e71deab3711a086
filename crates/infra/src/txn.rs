use serde::de::DeserializeOwned;
use serde::Serialize;

use millbook_core::{EntityId, TenantId};

use crate::coordinator::EngineError;
use crate::ledger_store::{Collection, DocKey, LedgerStore, VersionGuard, Write};

/// Staging buffer for one optimistic transaction attempt.
///
/// `LedgerTxn` records what an operation reads (as version guards) and what
/// it intends to write. Nothing touches the store until the coordinator
/// commits the buffered batch; a commit conflict throws the buffer away and
/// the operation runs again against fresh reads.
///
/// Reads are rejected once a write has been staged. Operations read
/// everything they depend on first, validate, then stage writes; that
/// ordering is what keeps the guard set complete.
pub struct LedgerTxn<'a, S> {
    store: &'a S,
    tenant_id: TenantId,
    guards: Vec<VersionGuard>,
    writes: Vec<Write>,
}

impl<'a, S> LedgerTxn<'a, S> {
    pub fn new(store: &'a S, tenant_id: TenantId) -> Self {
        Self {
            store,
            tenant_id,
            guards: Vec::new(),
            writes: Vec::new(),
        }
    }

    pub fn tenant_id(&self) -> TenantId {
        self.tenant_id
    }

    pub fn into_parts(self) -> (Vec<VersionGuard>, Vec<Write>) {
        (self.guards, self.writes)
    }
}

impl<'a, S: LedgerStore> LedgerTxn<'a, S> {
    /// Read a document and remember its version for the commit-time check.
    ///
    /// Absent documents are guarded too (version 0), so a concurrent create
    /// of the same document is detected as a conflict.
    pub fn read<T: DeserializeOwned>(
        &mut self,
        collection: Collection,
        id: EntityId,
    ) -> Result<Option<T>, EngineError> {
        if !self.writes.is_empty() {
            return Err(EngineError::ReadAfterWrite { collection, id });
        }

        let key = DocKey::new(collection, id);
        let (doc, version) = self.store.get(self.tenant_id, &key)?;
        self.guards.push(VersionGuard::new(key, version));

        match doc {
            Some(value) => {
                let decoded = serde_json::from_value(value)
                    .map_err(|e| EngineError::Codec(format!("decoding {key}: {e}")))?;
                Ok(Some(decoded))
            }
            None => Ok(None),
        }
    }

    /// Stage a full-document write at a known key.
    pub fn put<T: Serialize>(
        &mut self,
        collection: Collection,
        id: EntityId,
        doc: &T,
    ) -> Result<(), EngineError> {
        let key = DocKey::new(collection, id);
        let doc = serde_json::to_value(doc)
            .map_err(|e| EngineError::Codec(format!("encoding {key}: {e}")))?;
        self.writes.push(Write::Put { key, doc });
        Ok(())
    }

    /// Stage an append-only record under a fresh id and return that id.
    pub fn insert<T: Serialize>(
        &mut self,
        collection: Collection,
        doc: &T,
    ) -> Result<EntityId, EngineError> {
        let id = EntityId::new();
        let key = DocKey::new(collection, id);
        let doc = serde_json::to_value(doc)
            .map_err(|e| EngineError::Codec(format!("encoding {key}: {e}")))?;
        self.writes.push(Write::Insert { key, doc });
        Ok(id)
    }
}
