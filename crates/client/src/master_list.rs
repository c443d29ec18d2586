//! Dropdown ("autopopulate") data for products, customers and sellers.
//!
//! Lists are fetched from a [`MasterListSource`] and cached per list for a
//! fixed TTL. A failed refresh falls back to whatever was cached before, even
//! if expired, and to an empty list otherwise. The engine treats these lists
//! as opaque lookup tables.

use std::sync::Arc;

use chrono::Duration;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use gstdesk_invoicing::{LineEdit, ProductRef};

use crate::cache::{Clock, TtlCache};
use crate::error::ApiError;

/// Default freshness window for dropdown lists.
pub const DEFAULT_TTL_SECS: i64 = 5 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MasterList {
    Products,
    Customers,
    Sellers,
}

impl MasterList {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Customers => "customers",
            Self::Sellers => "sellers",
        }
    }
}

impl core::fmt::Display for MasterList {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable entry. Which display field is populated depends on the list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DropdownOption {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: Option<String>,
    pub fullname: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    /// Products only.
    pub rate: Option<Decimal>,
    /// Products only, percent.
    pub gst_rate: Option<Decimal>,
}

impl DropdownOption {
    /// Best available display label, falling back to the id.
    pub fn label(&self) -> &str {
        [&self.title, &self.fullname, &self.name, &self.company]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .find(|s| !s.trim().is_empty())
            .unwrap_or(&self.id)
    }

    /// Line edit for picking this product: reference plus its rate and GST
    /// rate (zero when the list does not carry them).
    pub fn priced_line_edit(&self) -> LineEdit {
        LineEdit::Priced {
            product_ref: ProductRef::new(self.id.clone()),
            rate: self.rate.unwrap_or_default(),
            tax_rate_percent: self.gst_rate.unwrap_or_default(),
        }
    }
}

/// Remote provider of master lists.
pub trait MasterListSource: Send + Sync {
    fn fetch(&self, list: MasterList) -> Result<Vec<DropdownOption>, ApiError>;

    fn search(&self, list: MasterList, query: &str) -> Result<Vec<DropdownOption>, ApiError>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutopopulateData {
    pub products: Vec<DropdownOption>,
    pub customers: Vec<DropdownOption>,
    pub sellers: Vec<DropdownOption>,
}

/// Cached access to master lists.
pub struct Autopopulate<S> {
    source: S,
    clock: Arc<dyn Clock>,
    cache: TtlCache<MasterList, Vec<DropdownOption>>,
}

impl<S: MasterListSource> Autopopulate<S> {
    pub fn new(source: S, clock: Arc<dyn Clock>) -> Self {
        Self::with_ttl(source, clock, Duration::seconds(DEFAULT_TTL_SECS))
    }

    pub fn with_ttl(source: S, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            source,
            clock,
            cache: TtlCache::new(ttl),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Options for `list`, served from cache while fresh.
    pub fn options(&mut self, list: MasterList) -> Vec<DropdownOption> {
        let now = self.clock.now();
        if let Some(cached) = self.cache.get_fresh(&list, now) {
            return cached.clone();
        }

        tracing::debug!(
            module = %list,
            ttl_secs = self.cache.ttl().num_seconds(),
            "master list cache miss"
        );
        match self.source.fetch(list) {
            Ok(options) => {
                self.cache.insert(list, options.clone(), now);
                options
            }
            Err(err) => {
                let fallback = self.cache.get_stale(&list).cloned().unwrap_or_default();
                tracing::warn!(
                    module = %list,
                    error = %err,
                    stale_entries = fallback.len(),
                    "failed to fetch master list; serving cached data"
                );
                fallback
            }
        }
    }

    /// Server-side search; never cached. Failures yield an empty list.
    pub fn search(&self, list: MasterList, query: &str) -> Vec<DropdownOption> {
        match self.source.search(list, query) {
            Ok(options) => options,
            Err(err) => {
                tracing::warn!(module = %list, error = %err, "master list search failed");
                Vec::new()
            }
        }
    }

    pub fn all(&mut self) -> AutopopulateData {
        AutopopulateData {
            products: self.options(MasterList::Products),
            customers: self.options(MasterList::Customers),
            sellers: self.options(MasterList::Sellers),
        }
    }

    /// Drop the cached list and fetch it again.
    pub fn refresh(&mut self, list: MasterList) -> Vec<DropdownOption> {
        self.cache.invalidate(&list);
        self.options(list)
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }
}
