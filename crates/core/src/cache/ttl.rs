//! Time-to-live classes for memoized upstream resources.

use std::time::Duration;

const MINUTE: u64 = 60;
const HOUR: u64 = 60 * MINUTE;

/// Volatility class of a cached resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceClass {
    /// The `/congress` listing.
    CongressList,
    /// One bill or amendment detail record.
    ItemDetail,
    /// Bill plus all of its relations.
    FullBill,
    /// Committee plus its associated items.
    CommitteeDetail,
    /// Nomination plus actions and committees.
    NominationDetail,
    /// One member's detail record.
    MemberDetail,
    /// A member's sponsored or cosponsored items.
    MemberLegislation,
    /// All members of a congress.
    MemberRoster,
    /// A page of committees.
    CommitteeList,
    /// A page of nominations.
    NominationList,
    /// A page of bills.
    BillList,
}

impl ResourceClass {
    /// Returns TTL for the class.
    pub fn ttl(self) -> Duration {
        let secs = match self {
            ResourceClass::CongressList => 24 * HOUR,
            ResourceClass::ItemDetail => 24 * HOUR,
            ResourceClass::FullBill => 2 * HOUR,
            ResourceClass::CommitteeDetail => 2 * HOUR,
            ResourceClass::NominationDetail => 2 * HOUR,
            ResourceClass::MemberDetail => HOUR,
            ResourceClass::MemberLegislation => 30 * MINUTE,
            ResourceClass::MemberRoster => 12 * HOUR,
            ResourceClass::CommitteeList => HOUR,
            ResourceClass::NominationList => 30 * MINUTE,
            ResourceClass::BillList => 30 * MINUTE,
        };
        Duration::from_secs(secs)
    }
}
