use serde::{Deserialize, Serialize};

/// One item of a ranked discovery result, pre-merge.
///
/// Only `id` and `popularity` matter to the merge; everything else the
/// provider sends (title, poster, vote counts, ...) rides along untouched in
/// `payload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateItem {
    pub id: i64,

    #[serde(default)]
    pub popularity: f64,

    #[serde(flatten)]
    pub payload: serde_json::Map<String, serde_json::Value>,
}

/// One page of a ranked discovery result as returned by the provider.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidatePage {
    #[serde(default = "default_page")]
    pub page: u32,

    #[serde(default)]
    pub results: Vec<CandidateItem>,

    #[serde(default)]
    pub total_pages: u32,

    #[serde(default)]
    pub total_results: u64,
}

fn default_page() -> u32 {
    1
}

/// Two candidate pages blended into one deduplicated, popularity-ranked,
/// size-capped list.
///
/// Pagination metadata here is a contract, not a computed truth:
/// `total_pages` is the maximum of the two source totals, and
/// `total_results` counts the deduplicated merge *before* truncation to the
/// cap. Callers must not assume either reflects the returned `results`
/// exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedResult {
    pub page: u32,
    pub results: Vec<CandidateItem>,
    pub total_results: u64,
    pub total_pages: u32,
}
