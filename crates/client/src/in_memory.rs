use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, RwLock};

use gstdesk_core::InvoiceId;
use gstdesk_invoicing::InvoiceRecord;

use crate::error::ApiError;
use crate::filter::{FilterCondition, matches_all};
use crate::gateway::InvoiceGateway;
use crate::master_list::{DropdownOption, MasterList, MasterListSource};

fn poisoned() -> ApiError {
    ApiError::transport("lock poisoned")
}

/// In-memory invoice API.
///
/// Intended for tests/dev. Invoice numbers are unique, as on the real API.
#[derive(Debug, Default)]
pub struct InMemoryInvoiceGateway {
    records: RwLock<BTreeMap<InvoiceId, InvoiceRecord>>,
    next_failure: Mutex<Option<ApiError>>,
}

impl InMemoryInvoiceGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next call fail with `err`.
    pub fn fail_next(&self, err: ApiError) {
        if let Ok(mut slot) = self.next_failure.lock() {
            *slot = Some(err);
        }
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn take_failure(&self) -> Result<(), ApiError> {
        let mut slot = self.next_failure.lock().map_err(|_| poisoned())?;
        match slot.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn ensure_unique_number(
        records: &BTreeMap<InvoiceId, InvoiceRecord>,
        number: &str,
        except: Option<&InvoiceId>,
    ) -> Result<(), ApiError> {
        let taken = records
            .iter()
            .any(|(id, r)| Some(id) != except && r.invoice_number == number);
        if taken {
            return Err(ApiError::conflict(format!(
                "Conflict: invoice number {number} already exists"
            )));
        }
        Ok(())
    }
}

impl InvoiceGateway for InMemoryInvoiceGateway {
    fn create(&self, record: &InvoiceRecord) -> Result<InvoiceRecord, ApiError> {
        self.take_failure()?;
        let mut records = self.records.write().map_err(|_| poisoned())?;
        Self::ensure_unique_number(&records, &record.invoice_number, None)?;

        let id = InvoiceId::generate();
        let stored = InvoiceRecord {
            id: Some(id.clone()),
            ..record.clone()
        };
        records.insert(id, stored.clone());
        Ok(stored)
    }

    fn update(&self, id: &InvoiceId, record: &InvoiceRecord) -> Result<InvoiceRecord, ApiError> {
        self.take_failure()?;
        let mut records = self.records.write().map_err(|_| poisoned())?;
        if !records.contains_key(id) {
            return Err(ApiError::not_found(format!("invoice {id}")));
        }
        Self::ensure_unique_number(&records, &record.invoice_number, Some(id))?;

        let stored = InvoiceRecord {
            id: Some(id.clone()),
            ..record.clone()
        };
        records.insert(id.clone(), stored.clone());
        Ok(stored)
    }

    fn get(&self, id: &InvoiceId) -> Result<InvoiceRecord, ApiError> {
        self.take_failure()?;
        let records = self.records.read().map_err(|_| poisoned())?;
        records
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::not_found(format!("invoice {id}")))
    }

    fn list(&self, filters: &[FilterCondition]) -> Result<Vec<InvoiceRecord>, ApiError> {
        self.take_failure()?;
        let records = self.records.read().map_err(|_| poisoned())?;

        let mut out = Vec::new();
        for record in records.values() {
            let row = serde_json::to_value(record)
                .map_err(|e| ApiError::transport(format!("failed to serialize record: {e}")))?;
            if matches_all(filters, &row) {
                out.push(record.clone());
            }
        }
        Ok(out)
    }

    fn delete(&self, id: &InvoiceId) -> Result<(), ApiError> {
        self.take_failure()?;
        let mut records = self.records.write().map_err(|_| poisoned())?;
        records
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| ApiError::not_found(format!("invoice {id}")))
    }

    fn delete_many(&self, ids: &[InvoiceId]) -> Result<usize, ApiError> {
        self.take_failure()?;
        let mut records = self.records.write().map_err(|_| poisoned())?;
        Ok(ids.iter().filter(|id| records.remove(*id).is_some()).count())
    }
}

/// In-memory master lists with a switchable outage.
#[derive(Debug, Default)]
pub struct InMemoryMasterList {
    lists: RwLock<HashMap<MasterList, Vec<DropdownOption>>>,
    unavailable: AtomicBool,
    fetches: AtomicUsize,
}

impl InMemoryMasterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, list: MasterList, options: Vec<DropdownOption>) {
        if let Ok(mut lists) = self.lists.write() {
            lists.insert(list, options);
        }
    }

    /// While set, every call fails with 503.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of `fetch` calls that reached the source.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn ensure_available(&self) -> Result<(), ApiError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(ApiError::from_status(503, "Service Unavailable"));
        }
        Ok(())
    }
}

impl MasterListSource for InMemoryMasterList {
    fn fetch(&self, list: MasterList) -> Result<Vec<DropdownOption>, ApiError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.ensure_available()?;
        let lists = self.lists.read().map_err(|_| poisoned())?;
        Ok(lists.get(&list).cloned().unwrap_or_default())
    }

    fn search(&self, list: MasterList, query: &str) -> Result<Vec<DropdownOption>, ApiError> {
        self.ensure_available()?;
        let needle = query.to_lowercase();
        let lists = self.lists.read().map_err(|_| poisoned())?;
        Ok(lists
            .get(&list)
            .map(|options| {
                options
                    .iter()
                    .filter(|o| o.label().to_lowercase().contains(&needle))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiErrorKind;
    use crate::filter::Predicate;

    fn record(number: &str, buyer: &str) -> InvoiceRecord {
        InvoiceRecord {
            invoice_number: number.into(),
            buyer: buyer.into(),
            ..InvoiceRecord::default()
        }
    }

    #[test]
    fn create_assigns_ids_and_rejects_duplicate_numbers() {
        let gateway = InMemoryInvoiceGateway::new();
        let stored = gateway.create(&record("INV-1", "acme")).unwrap();
        assert!(stored.id.is_some());

        let err = gateway.create(&record("INV-1", "other")).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::Conflict);
        assert_eq!(gateway.len(), 1);
    }

    #[test]
    fn update_get_and_delete() {
        let gateway = InMemoryInvoiceGateway::new();
        let id = gateway.create(&record("INV-1", "acme")).unwrap().id.unwrap();

        gateway.update(&id, &record("INV-1", "acme corp")).unwrap();
        assert_eq!(gateway.get(&id).unwrap().buyer, "acme corp");

        gateway.delete(&id).unwrap();
        assert_eq!(gateway.get(&id).unwrap_err().kind, ApiErrorKind::NotFound);
        assert_eq!(
            gateway.update(&id, &record("INV-1", "x")).unwrap_err().kind,
            ApiErrorKind::NotFound
        );
    }

    #[test]
    fn list_filters_and_delete_many() {
        let gateway = InMemoryInvoiceGateway::new();
        let a = gateway.create(&record("INV-1", "Acme")).unwrap().id.unwrap();
        let b = gateway.create(&record("INV-2", "Bolt")).unwrap().id.unwrap();
        gateway.create(&record("INV-3", "acme east")).unwrap();

        let acme = gateway
            .list(&[FilterCondition::new("buyer", Predicate::StartsWith("ACME".into()))])
            .unwrap();
        assert_eq!(acme.len(), 2);
        assert_eq!(gateway.list(&[]).unwrap().len(), 3);

        assert_eq!(gateway.delete_many(&[a, b, InvoiceId::generate()]).unwrap(), 2);
        assert_eq!(gateway.len(), 1);
    }

    #[test]
    fn injected_failure_applies_once() {
        let gateway = InMemoryInvoiceGateway::new();
        gateway.fail_next(ApiError::from_status(500, "Internal Server Error"));

        let err = gateway.create(&record("INV-1", "acme")).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::ServerError);
        assert!(gateway.create(&record("INV-1", "acme")).is_ok());
    }
}
