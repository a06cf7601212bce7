//! Legislation lookup tables.
//!
//! The allow-lists and the type → deep-link segment table are configuration
//! data. They can be overridden through the layered config like any other
//! field; the defaults mirror the upstream API's type codes.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

const DEFAULT_SITE_URL: &str = "https://www.congress.gov";

const BILL_TYPES: &[&str] = &["hr", "s", "hres", "sres", "hjres", "sjres", "hconres", "sconres"];

const AMENDMENT_TYPES: &[&str] = &["samdt", "hamdt", "sa", "ha", "suamdt"];

const TYPE_PATHS: &[(&str, &str)] = &[
    ("HR", "house-bill"),
    ("S", "senate-bill"),
    ("HRES", "house-resolution"),
    ("SRES", "senate-resolution"),
    ("HJRES", "house-joint-resolution"),
    ("SJRES", "senate-joint-resolution"),
    ("HCONRES", "house-concurrent-resolution"),
    ("SCONRES", "senate-concurrent-resolution"),
    ("SAMDT", "senate-amendment"),
    ("HAMDT", "house-amendment"),
    ("SA", "senate-amendment"),
    ("HA", "house-amendment"),
    ("SUAMDT", "senate-unamendable-amendment"),
];

/// Type-code tables and the public site used for deep links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Public site that deep links point at.
    #[serde(default = "default_site_url")]
    pub site_url: String,

    /// Lower-case bill type codes accepted by the detail endpoints.
    #[serde(default = "default_bill_types")]
    pub bill_types: BTreeSet<String>,

    /// Lower-case amendment type codes accepted by the detail endpoints.
    #[serde(default = "default_amendment_types")]
    pub amendment_types: BTreeSet<String>,

    /// Upper-case type code → site path segment.
    #[serde(default = "default_type_paths")]
    pub type_paths: BTreeMap<String, String>,
}

fn default_site_url() -> String {
    DEFAULT_SITE_URL.into()
}

fn default_bill_types() -> BTreeSet<String> {
    BILL_TYPES.iter().map(|t| (*t).to_string()).collect()
}

fn default_amendment_types() -> BTreeSet<String> {
    AMENDMENT_TYPES.iter().map(|t| (*t).to_string()).collect()
}

fn default_type_paths() -> BTreeMap<String, String> {
    TYPE_PATHS
        .iter()
        .map(|(code, path)| ((*code).to_string(), (*path).to_string()))
        .collect()
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            site_url: default_site_url(),
            bill_types: default_bill_types(),
            amendment_types: default_amendment_types(),
            type_paths: default_type_paths(),
        }
    }
}

impl Catalog {
    /// Case-insensitive membership in the bill allow-list.
    pub fn is_bill_type(&self, code: &str) -> bool {
        self.bill_types.contains(&code.to_ascii_lowercase())
    }

    /// Case-insensitive membership in the amendment allow-list.
    pub fn is_amendment_type(&self, code: &str) -> bool {
        self.amendment_types.contains(&code.to_ascii_lowercase())
    }

    /// Site path segment for a type code, if one is mapped.
    pub fn type_path(&self, code: &str) -> Option<&str> {
        self.type_paths.get(&code.to_ascii_uppercase()).map(String::as_str)
    }

    /// Site base without a trailing slash.
    pub fn site(&self) -> &str {
        self.site_url.trim_end_matches('/')
    }

    /// Allowed type codes that have no deep-link segment.
    pub fn unmapped_types(&self) -> Vec<String> {
        self.bill_types
            .iter()
            .chain(self.amendment_types.iter())
            .filter(|code| self.type_path(code).is_none())
            .cloned()
            .collect()
    }
}
