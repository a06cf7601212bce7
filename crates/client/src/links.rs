//! Deep links into the public site and detail-page paths.

use std::sync::LazyLock;

use legis_core::Catalog;
use regex::Regex;

use crate::identity::ItemKind;

static REPORT_CITATION: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)^\s*([a-z]+)\.?\s+rept\.?\s+(\d+)-(\d+)\s*$").ok());

/// English ordinal: 1st, 2nd, 3rd, 11th, 112th, 121st.
pub fn ordinal(n: u32) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// `{site}/{bill|amendment}/{ord}-congress/{segment}/{number}`.
///
/// `None` when the type code has no site segment.
pub fn legislation_url(catalog: &Catalog, kind: ItemKind, congress: u32, type_code: &str, number: &str) -> Option<String> {
    let Some(segment) = catalog.type_path(type_code) else {
        tracing::debug!(type_code, "no site path for type code");
        return None;
    };
    Some(format!(
        "{}/{}/{}-congress/{}/{}",
        catalog.site(),
        kind.segment(),
        ordinal(congress),
        segment,
        number
    ))
}

/// Committee page; joint committees live under `joint-committee`.
pub fn committee_url(catalog: &Catalog, chamber: &str, code: &str) -> Option<String> {
    let section = match chamber.to_ascii_lowercase().as_str() {
        "house" => "house-committee",
        "senate" => "senate-committee",
        "joint" => "joint-committee",
        _ => return None,
    };
    Some(format!("{}/committee/{}/{}", catalog.site(), section, code))
}

pub fn nomination_url(catalog: &Catalog, congress: u32, number: &str) -> String {
    format!("{}/nomination/{}-congress/{}", catalog.site(), ordinal(congress), number)
}

/// Committee report page parsed from a citation such as `H. Rept. 118-123`.
///
/// Only House (`hrpt`), Senate (`srpt`) and executive (`erpt`) reports link.
pub fn report_url(catalog: &Catalog, citation: &str) -> Option<String> {
    let caps = REPORT_CITATION.as_ref()?.captures(citation)?;
    let code = match caps[1].to_ascii_lowercase().as_str() {
        "h" => "hrpt",
        "s" => "srpt",
        "e" | "ex" | "exec" => "erpt",
        _ => return None,
    };
    let congress: u32 = caps[2].parse().ok()?;
    Some(format!(
        "{}/committee-report/{}-congress/{}/{}",
        catalog.site(),
        ordinal(congress),
        code,
        &caps[3]
    ))
}

/// Local detail path for a bill.
pub fn bill_page_path(congress: u32, type_code: &str, number: &str) -> String {
    format!("/bill/{}/{}/{}", congress, type_code.to_ascii_lowercase(), number)
}

/// Local detail path for a committee.
pub fn committee_page_path(chamber: &str, code: &str) -> String {
    format!("/committee/{}/{}", chamber.to_ascii_lowercase(), code)
}

/// Local detail path for a nomination.
pub fn nomination_page_path(congress: u32, number: &str) -> String {
    format!("/nomination/{congress}/{number}")
}
