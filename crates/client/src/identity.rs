//! Legislation identity resolution.
//!
//! Sponsored/cosponsored list entries mix bills and amendments, and their
//! inline fields are unreliable (`"type": "None"` on amendments, numbers as
//! strings, missing congress). The detail-resource URL is the one thing that
//! always names the item, so identity is derived from its path.

use std::fmt;

use legis_core::{Catalog, FetchError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::value::{as_u32, parse_digits, str_field};

/// Bill or amendment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Bill,
    Amendment,
}

impl ItemKind {
    /// Path segment used by both the API and the public site.
    pub fn segment(self) -> &'static str {
        match self {
            ItemKind::Bill => "bill",
            ItemKind::Amendment => "amendment",
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment.to_ascii_lowercase().as_str() {
            "bill" => Some(ItemKind::Bill),
            "amendment" => Some(ItemKind::Amendment),
            _ => None,
        }
    }

    fn allows(self, catalog: &Catalog, type_code: &str) -> bool {
        match self {
            ItemKind::Bill => catalog.is_bill_type(type_code),
            ItemKind::Amendment => catalog.is_amendment_type(type_code),
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::Bill => f.write_str("Bill"),
            ItemKind::Amendment => f.write_str("Amendment"),
        }
    }
}

/// Canonical key of a bill or amendment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LegislationId {
    pub kind: ItemKind,
    pub congress: u32,
    /// Upper-case type code, e.g. `HR` or `SAMDT`.
    pub type_code: String,
    pub number: u32,
}

impl LegislationId {
    /// Detail endpoint, e.g. `/amendment/119/samdt/2216`.
    pub fn endpoint(&self) -> String {
        format!(
            "/{}/{}/{}/{}",
            self.kind.segment(),
            self.congress,
            self.type_code.to_ascii_lowercase(),
            self.number
        )
    }
}

impl fmt::Display for LegislationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-{}{}", self.kind, self.congress, self.type_code, self.number)
    }
}

/// Kind suggested by the inline fields.
///
/// `amendmentNumber` marks an amendment; otherwise `number` plus a real
/// `type` marks a bill. `"None"` counts as no type at all.
fn inline_hint(obj: &Map<String, Value>) -> Option<(ItemKind, Option<u32>)> {
    if let Some(n) = obj.get("amendmentNumber").filter(|v| !v.is_null()) {
        return Some((ItemKind::Amendment, as_u32(n)));
    }

    let number = obj.get("number").filter(|v| !v.is_null())?;
    let has_type = str_field(obj, "type").is_some_and(|t| !t.eq_ignore_ascii_case("none"));
    has_type.then(|| (ItemKind::Bill, as_u32(number)))
}

/// Path segments after any `/v{n}` version prefix.
fn path_segments(raw: &str) -> Vec<String> {
    let path = match url::Url::parse(raw) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => raw.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    let mut segments: Vec<String> = path.split('/').filter(|s| !s.is_empty()).map(str::to_string).collect();
    let versioned = segments
        .first()
        .is_some_and(|s| s.len() > 1 && s.starts_with('v') && s[1..].bytes().all(|b| b.is_ascii_digit()));
    if versioned {
        segments.remove(0);
    }
    segments
}

/// Identify a raw list entry.
///
/// Returns `None` for anything that is not an object with a canonical
/// `/{kind}/{congress}/{type}/{number}` URL whose type is in the catalog's
/// allow-list for that kind. Inline fields never override the URL; a
/// disagreement is only logged.
pub fn resolve(item: &Value, catalog: &Catalog) -> Option<LegislationId> {
    let obj = item.as_object()?;
    let hint = inline_hint(obj);
    let url = str_field(obj, "url");

    if url.is_none() && hint.is_none() {
        return None;
    }

    let Some(url) = url else {
        tracing::debug!(?hint, "list entry has no detail URL");
        return None;
    };

    let segments = path_segments(url);
    if segments.len() < 4 {
        tracing::debug!(url, "detail URL too short to identify");
        return None;
    }

    let kind = ItemKind::from_segment(&segments[0])?;
    let congress = parse_digits(&segments[1]).filter(|c| *c > 0)?;
    let type_code = segments[2].to_ascii_lowercase();
    let number = parse_digits(&segments[3]).filter(|n| *n > 0)?;

    if !kind.allows(catalog, &type_code) {
        tracing::debug!(url, %kind, type_code, "type code not in allow-list");
        return None;
    }

    if let Some((hint_kind, hint_number)) = hint {
        if hint_kind != kind {
            tracing::debug!(url, %kind, %hint_kind, "inline fields disagree with URL kind");
        }
        if hint_number.is_some_and(|n| n != number) {
            tracing::info!(url, number, ?hint_number, "inline number disagrees with URL; using URL");
        }
    }

    if let Some(inline) = obj.get("congress").and_then(as_u32)
        && inline != congress
    {
        tracing::debug!(url, congress, inline, "inline congress disagrees with URL");
    }

    Some(LegislationId { kind, congress, type_code: type_code.to_ascii_uppercase(), number })
}

/// Normalized bioguide id: one letter then six digits, e.g. `P000197`.
///
/// Identifiers are spliced into request paths, so anything else is rejected
/// before it reaches the cache or the transport.
pub fn bioguide_id(raw: &str) -> Result<String, FetchError> {
    let id = raw.trim().to_ascii_uppercase();
    let bytes = id.as_bytes();
    let valid = bytes.len() == 7 && bytes[0].is_ascii_alphabetic() && bytes[1..].iter().all(u8::is_ascii_digit);
    if !valid {
        return Err(FetchError::invalid_input(format!("Invalid bioguide id: {raw}")));
    }
    Ok(id)
}

/// Lowercased committee system code such as `hsag00`.
pub fn committee_code(raw: &str) -> Result<String, FetchError> {
    let code = raw.trim().to_ascii_lowercase();
    if code.is_empty() {
        return Err(FetchError::invalid_input("Committee code is required"));
    }
    if !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(FetchError::invalid_input(format!("Invalid committee code: {raw}")));
    }
    Ok(code)
}

/// Nomination number, digits with an optional `-part` suffix (`1064`, `1064-1`).
pub fn nomination_number(raw: &str) -> Result<String, FetchError> {
    let number = raw.trim();
    if number.is_empty() {
        return Err(FetchError::invalid_input("Nomination number is required"));
    }
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    let valid = match number.split_once('-') {
        Some((base, part)) => digits(base) && digits(part),
        None => digits(number),
    };
    if !valid {
        return Err(FetchError::invalid_input(format!("Invalid nomination number: {raw}")));
    }
    Ok(number.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> Catalog {
        Catalog::default()
    }

    #[test]
    fn test_amendment_with_placeholder_type() {
        let item = json!({
            "amendmentNumber": 2216,
            "type": "None",
            "congress": 119,
            "url": "https://api.congress.gov/v3/amendment/119/samdt/2216?format=json"
        });

        let id = resolve(&item, &catalog()).unwrap();
        assert_eq!(
            id,
            LegislationId { kind: ItemKind::Amendment, congress: 119, type_code: "SAMDT".into(), number: 2216 }
        );
        assert_eq!(id.endpoint(), "/amendment/119/samdt/2216");
    }

    #[test]
    fn test_bill_entry() {
        let item = json!({
            "number": "9775",
            "type": "HR",
            "congress": 118,
            "url": "https://api.congress.gov/v3/bill/118/hr/9775?format=json"
        });

        let id = resolve(&item, &catalog()).unwrap();
        assert_eq!(id.kind, ItemKind::Bill);
        assert_eq!(id.congress, 118);
        assert_eq!(id.type_code, "HR");
        assert_eq!(id.number, 9775);
    }

    #[test]
    fn test_url_wins_over_conflicting_inline_fields() {
        let item = json!({
            "number": 1,
            "type": "S",
            "congress": 117,
            "url": "https://api.congress.gov/v3/bill/118/hjres/42"
        });

        let id = resolve(&item, &catalog()).unwrap();
        assert_eq!(
            id,
            LegislationId { kind: ItemKind::Bill, congress: 118, type_code: "HJRES".into(), number: 42 }
        );
    }

    #[test]
    fn test_url_without_version_prefix() {
        let item = json!({"number": 5, "type": "S", "url": "/bill/119/s/5"});
        let id = resolve(&item, &catalog()).unwrap();
        assert_eq!(id.congress, 119);
        assert_eq!(id.type_code, "S");
    }

    #[test]
    fn test_placeholder_type_without_url_is_rejected() {
        let item = json!({"amendmentNumber": 2216, "type": "None", "congress": 119});
        assert!(resolve(&item, &catalog()).is_none());

        let item = json!({"number": 12, "type": "None", "congress": 119, "url": ""});
        assert!(resolve(&item, &catalog()).is_none());
    }

    #[test]
    fn test_malformed_inputs_are_rejected() {
        let catalog = catalog();
        let cases = [
            json!(null),
            json!("bill/118/hr/1"),
            json!([1, 2, 3]),
            json!({}),
            json!({"number": 1, "type": "HR", "url": "https://api.congress.gov/v3/bill/118/hr"}),
            json!({"number": 1, "type": "HR", "url": "https://api.congress.gov/v3/bill/118/hr/12a"}),
            json!({"number": 1, "type": "HR", "url": "https://api.congress.gov/v3/bill/abc/hr/1"}),
            json!({"number": 1, "type": "HR", "url": "https://api.congress.gov/v3/bill/118/xx/1"}),
            json!({"number": 1, "type": "HR", "url": "https://api.congress.gov/v3/law/118/pub/1"}),
            json!({"number": 1, "type": "HR", "url": "https://api.congress.gov/v3/amendment/118/hr/1"}),
            json!({"number": 0, "type": "HR", "url": "https://api.congress.gov/v3/bill/118/hr/0"}),
            json!({"number": 1, "type": "HR", "url": 42}),
        ];

        for case in cases {
            assert!(resolve(&case, &catalog).is_none(), "expected rejection: {case}");
        }
    }

    #[test]
    fn test_catalog_allow_list_is_respected() {
        let mut catalog = catalog();
        catalog.bill_types.remove("hr");

        let item = json!({"number": 1, "type": "HR", "url": "/v3/bill/118/hr/1"});
        assert!(resolve(&item, &catalog).is_none());
    }

    #[test]
    fn test_display() {
        let id = LegislationId { kind: ItemKind::Bill, congress: 118, type_code: "HR".into(), number: 9775 };
        assert_eq!(id.to_string(), "Bill 118-HR9775");
    }

    #[test]
    fn test_bioguide_id() {
        assert_eq!(bioguide_id(" p000197 ").unwrap(), "P000197");
        for bad in ["", "P00019", "P0001970", "PP00019", "../BILL", "P00019/", "P0001é"] {
            let err = bioguide_id(bad).unwrap_err();
            assert_eq!(err.kind, legis_core::ErrorKind::InvalidInput, "expected rejection: {bad}");
        }
    }

    #[test]
    fn test_committee_code() {
        assert_eq!(committee_code(" HSAG00 ").unwrap(), "hsag00");
        assert!(committee_code("  ").is_err());
        assert!(committee_code("a?b").is_err());
        assert!(committee_code("hsag00/../x").is_err());
    }

    #[test]
    fn test_nomination_number() {
        assert_eq!(nomination_number(" 1064 ").unwrap(), "1064");
        assert_eq!(nomination_number("1064-1").unwrap(), "1064-1");
        for bad in ["", "1/../x", "1064-", "-1", "1-2-3", "PN1064", "1064?x=1"] {
            assert!(nomination_number(bad).is_err(), "expected rejection: {bad}");
        }
    }
}
