//! Client code for legis.
//!
//! This crate talks to the congress.gov API: the HTTP transport, identity
//! resolution for list entries, detail and list fetchers, sub-resource
//! aggregation, and the composites built on top of them. [`CongressService`]
//! wraps every fetcher in the memo cache.

pub mod composite;
pub mod detail;
pub mod identity;
pub mod links;
pub mod listing;
pub mod relation;
pub mod service;
pub mod transport;
mod value;

pub use composite::{
    CommitteeDetail, FullBill, LegislationList, MemberProfile, NominationDetail, Sponsorship, fetch_committee_detail,
    fetch_full_bill, fetch_member_legislation, fetch_nomination_detail,
};
pub use detail::{LegislationDetail, fetch_amendment_detail, fetch_bill_detail, fetch_detail};
pub use identity::{ItemKind, LegislationId, bioguide_id, committee_code, nomination_number, resolve};
pub use listing::{Chamber, Congress, MemberDetail, Page, RosterMember};
pub use relation::{Relation, fetch_sub_resource};
pub use service::CongressService;
pub use transport::{HttpTransport, Transport, TransportConfig, TransportError};
