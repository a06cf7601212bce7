//! Memoized public API over the fetchers.
//!
//! Every call is keyed by its function name and normalized arguments and
//! cached for its [`ResourceClass`] TTL. Error results are cached too.

use std::sync::Arc;

use legis_core::{AppConfig, CacheDb, Catalog, Error, FetchError, ResourceClass};

use crate::composite::{
    self, CommitteeDetail, FullBill, LegislationList, MemberProfile, NominationDetail, Sponsorship,
};
use crate::detail::{self, LegislationDetail, legislation_id};
use crate::identity::{self, ItemKind, LegislationId};
use crate::listing::{self, Chamber, Congress, MemberDetail, Page, RosterMember};
use crate::transport::{HttpTransport, Transport, TransportConfig};

/// Shared handle to the upstream API and the memo cache.
///
/// Cheap to clone; clones share the transport, cache and catalog.
#[derive(Clone)]
pub struct CongressService {
    transport: Arc<dyn Transport>,
    cache: CacheDb,
    catalog: Arc<Catalog>,
    fan_out: usize,
    fallback_congress: u32,
}

impl CongressService {
    pub fn new(transport: Arc<dyn Transport>, cache: CacheDb, config: &AppConfig) -> Self {
        Self {
            transport,
            cache,
            catalog: Arc::new(config.catalog.clone()),
            fan_out: config.fan_out.max(1),
            fallback_congress: config.fallback_congress,
        }
    }

    /// HTTP transport and an on-disk cache at `config.db_path`.
    pub async fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let transport = HttpTransport::new(TransportConfig::from(config)).map_err(FetchError::from)?;
        let cache = CacheDb::open(&config.db_path).await?;
        tracing::info!(db_path = %config.db_path.display(), base_url = %config.base_url, "congress service ready");
        Ok(Self::new(Arc::new(transport), cache, config))
    }

    pub fn cache(&self) -> &CacheDb {
        &self.cache
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub async fn congress_list(&self) -> Result<Vec<Congress>, FetchError> {
        let transport = self.transport.clone();
        self.cache
            .memoize("congress_list", &(), ResourceClass::CongressList.ttl(), || async move {
                listing::fetch_congress_list(transport.as_ref()).await
            })
            .await
    }

    /// Newest congress upstream, else the configured fallback.
    pub async fn default_congress(&self) -> u32 {
        match self.congress_list().await {
            Ok(list) => listing::newest_congress(&list).unwrap_or_else(|| {
                tracing::warn!(fallback = self.fallback_congress, "congress list empty, using fallback");
                self.fallback_congress
            }),
            Err(e) => {
                tracing::warn!(error = %e, fallback = self.fallback_congress, "congress list unavailable, using fallback");
                self.fallback_congress
            }
        }
    }

    /// Detail of one bill or amendment, keyed by its canonical id.
    pub async fn legislation_detail(&self, id: LegislationId) -> Result<LegislationDetail, FetchError> {
        let transport = self.transport.clone();
        let catalog = self.catalog.clone();
        let key = id.clone();
        self.cache
            .memoize("legislation_detail", &key, ResourceClass::ItemDetail.ttl(), || async move {
                detail::fetch_detail(transport.as_ref(), &catalog, &id).await
            })
            .await
    }

    pub async fn bill_detail(&self, congress: u32, type_code: &str, number: u32) -> Result<LegislationDetail, FetchError> {
        let id = legislation_id(&self.catalog, ItemKind::Bill, congress, type_code, number)?;
        self.legislation_detail(id).await
    }

    pub async fn amendment_detail(
        &self, congress: u32, type_code: &str, number: u32,
    ) -> Result<LegislationDetail, FetchError> {
        let id = legislation_id(&self.catalog, ItemKind::Amendment, congress, type_code, number)?;
        self.legislation_detail(id).await
    }

    pub async fn full_bill(&self, congress: u32, type_code: &str, number: u32) -> Result<FullBill, FetchError> {
        let id = legislation_id(&self.catalog, ItemKind::Bill, congress, type_code, number)?;
        let transport = self.transport.clone();
        let catalog = self.catalog.clone();
        let args = (id.congress, id.type_code.clone(), id.number);
        self.cache
            .memoize("full_bill", &args, ResourceClass::FullBill.ttl(), || async move {
                composite::fetch_full_bill(transport.as_ref(), &catalog, id.congress, &id.type_code, id.number).await
            })
            .await
    }

    pub async fn member_detail(&self, bioguide_id: &str) -> Result<MemberDetail, FetchError> {
        let bioguide_id = identity::bioguide_id(bioguide_id)?;
        let transport = self.transport.clone();
        let key = bioguide_id.clone();
        self.cache
            .memoize("member_detail", &key, ResourceClass::MemberDetail.ttl(), || async move {
                listing::fetch_member_detail(transport.as_ref(), &bioguide_id).await
            })
            .await
    }

    /// Sponsored or cosponsored items with details, each detail memoized on
    /// its own so lists of different members share entries.
    pub async fn member_legislation(&self, bioguide_id: &str, side: Sponsorship) -> Result<LegislationList, FetchError> {
        let bioguide_id = identity::bioguide_id(bioguide_id)?;
        let args = (bioguide_id.clone(), side);
        let service = self.clone();
        self.cache
            .memoize("member_legislation", &args, ResourceClass::MemberLegislation.ttl(), || async move {
                let fetcher = service.clone();
                composite::fetch_member_legislation(
                    service.transport.as_ref(),
                    &service.catalog,
                    &bioguide_id,
                    side,
                    service.fan_out,
                    move |id| {
                        let fetcher = fetcher.clone();
                        async move { fetcher.legislation_detail(id).await }
                    },
                )
                .await
            })
            .await
    }

    /// Member detail plus both legislation lists.
    ///
    /// Fails only when the member record itself cannot be fetched.
    pub async fn member_profile(&self, bioguide_id: &str) -> Result<MemberProfile, FetchError> {
        let member = self.member_detail(bioguide_id).await?;
        let (sponsored, cosponsored) = tokio::join!(
            self.member_legislation(bioguide_id, Sponsorship::Sponsored),
            self.member_legislation(bioguide_id, Sponsorship::Cosponsored),
        );
        MemberProfile::assemble(Ok(member), sponsored, cosponsored)
    }

    pub async fn member_roster(&self, congress: Option<u32>) -> Result<Vec<RosterMember>, FetchError> {
        let transport = self.transport.clone();
        self.cache
            .memoize("member_roster", &congress, ResourceClass::MemberRoster.ttl(), || async move {
                listing::fetch_member_roster(transport.as_ref(), congress).await
            })
            .await
    }

    /// Bills of `congress` (default congress when `None`).
    pub async fn bill_list(
        &self, congress: Option<u32>, bill_type: Option<&str>, offset: u32, limit: u32,
    ) -> Result<Page, FetchError> {
        if let Some(code) = bill_type.filter(|code| !self.catalog.is_bill_type(code)) {
            return Err(FetchError::invalid_input(format!("Invalid bill type: {code}")));
        }
        let congress = match congress {
            Some(congress) => congress,
            None => self.default_congress().await,
        };
        let bill_type = bill_type.map(str::to_ascii_uppercase);

        let transport = self.transport.clone();
        let catalog = self.catalog.clone();
        let args = (congress, bill_type.clone(), offset, limit);
        self.cache
            .memoize("bill_list", &args, ResourceClass::BillList.ttl(), || async move {
                listing::fetch_bill_list(transport.as_ref(), &catalog, congress, bill_type.as_deref(), offset, limit).await
            })
            .await
    }

    pub async fn committee_list(
        &self, congress: Option<u32>, chamber: Option<Chamber>, offset: u32, limit: u32,
    ) -> Result<Page, FetchError> {
        let transport = self.transport.clone();
        let args = (congress, chamber, offset, limit);
        self.cache
            .memoize("committee_list", &args, ResourceClass::CommitteeList.ttl(), || async move {
                listing::fetch_committee_list(transport.as_ref(), congress, chamber, offset, limit).await
            })
            .await
    }

    pub async fn committee_detail(&self, chamber: Chamber, code: &str) -> Result<CommitteeDetail, FetchError> {
        let code = identity::committee_code(code)?;
        let transport = self.transport.clone();
        let catalog = self.catalog.clone();
        let args = (chamber, code.clone());
        self.cache
            .memoize("committee_detail", &args, ResourceClass::CommitteeDetail.ttl(), || async move {
                composite::fetch_committee_detail(transport.as_ref(), &catalog, chamber, &code).await
            })
            .await
    }

    pub async fn nomination_list(&self, congress: Option<u32>, offset: u32, limit: u32) -> Result<Page, FetchError> {
        let transport = self.transport.clone();
        let catalog = self.catalog.clone();
        let args = (congress, offset, limit);
        self.cache
            .memoize("nomination_list", &args, ResourceClass::NominationList.ttl(), || async move {
                listing::fetch_nomination_list(transport.as_ref(), &catalog, congress, offset, limit).await
            })
            .await
    }

    pub async fn nomination_detail(&self, congress: u32, number: &str) -> Result<NominationDetail, FetchError> {
        let number = identity::nomination_number(number)?;
        let transport = self.transport.clone();
        let catalog = self.catalog.clone();
        let args = (congress, number.clone());
        self.cache
            .memoize("nomination_detail", &args, ResourceClass::NominationDetail.ttl(), || async move {
                composite::fetch_nomination_detail(transport.as_ref(), &catalog, congress, &number).await
            })
            .await
    }
}
