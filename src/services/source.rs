// src/services/source.rs

//! Upstream catalog access.

use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use crate::error::Result;
use crate::models::wire::{BulkCreature, CreatureDetail, ListingPage};
use crate::models::{ApiConfig, CreatureRecord};
use crate::utils::{http, url as endpoints};

/// Read-only access to a creature catalog.
///
/// Every method returns records already normalized into [`CreatureRecord`];
/// a non-success status, a transport failure and an undecodable body all
/// surface as an error.
#[async_trait]
pub trait CreatureSource: Send + Sync {
    /// Fetch a single creature by identifier.
    async fn fetch_by_id(&self, id: u32) -> Result<CreatureRecord>;

    /// Fetch every creature from the bulk endpoint.
    async fn fetch_all(&self) -> Result<Vec<CreatureRecord>>;

    /// Search the listing endpoint by name.
    async fn search(&self, name: &str) -> Result<Vec<CreatureRecord>>;
}

/// [`CreatureSource`] backed by the public HTTP API.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Url,
    bulk_url: Url,
    page_size: u32,
}

impl HttpSource {
    /// Create a source with a client built from `config`.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let client = http::create_client(config)?;
        Self::with_client(config, client)
    }

    /// Create a source around an existing client.
    pub fn with_client(config: &ApiConfig, client: Client) -> Result<Self> {
        Ok(Self {
            client,
            base_url: endpoints::base(&config.base_url)?,
            bulk_url: Url::parse(&config.bulk_url)?,
            page_size: config.search_page_size.max(1),
        })
    }
}

#[async_trait]
impl CreatureSource for HttpSource {
    async fn fetch_by_id(&self, id: u32) -> Result<CreatureRecord> {
        let url = endpoints::detail(&self.base_url, id)?;
        log::debug!("GET {url}");
        let detail: CreatureDetail = http::get_json(&self.client, &url).await?;
        Ok(detail.into())
    }

    async fn fetch_all(&self) -> Result<Vec<CreatureRecord>> {
        log::debug!("GET {}", self.bulk_url);
        let items: Vec<BulkCreature> = http::get_json(&self.client, &self.bulk_url).await?;
        Ok(items.into_iter().map(CreatureRecord::from).collect())
    }

    async fn search(&self, name: &str) -> Result<Vec<CreatureRecord>> {
        let url = endpoints::listing(&self.base_url, name, self.page_size)?;
        log::debug!("GET {url}");
        let page: ListingPage = http::get_json(&self.client, &url).await?;
        log::debug!(
            "Listing page {} ({} total)",
            page.pageable.label(),
            page.pageable.total_elements
        );
        Ok(page.content.into_iter().map(CreatureRecord::from).collect())
    }
}
