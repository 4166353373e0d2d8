use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type ID = String;

/// Analysis payload returned by the workflow for one URL/keyword pair.
/// Immutable once received; field names follow the wire format.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetadataData {
  pub url: String,
  pub keyword: String,
  pub current: CurrentMetadata,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub competitor_insight: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub competitors: Option<Vec<CompetitorItem>>,
  pub optimized_variations: Vec<VariationItem>,
}

/// Meta tags scraped from the target page. Lengths are omitted by some
/// workflow versions.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CurrentMetadata {
  pub title: String,
  pub description: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub title_length: Option<i64>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description_length: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VariationItem {
  pub title: String,
  pub title_length: i64,
  pub description: String,
  pub description_length: i64,
  pub strategy: Strategy,
  pub meets_requirements: MeetsRequirements,
}

/// Persuasion framing of a generated variation. Closed set: a value outside
/// these three fails deserialization rather than reaching display code.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
  Urgency,
  Benefits,
  SocialProof,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MeetsRequirements {
  pub title_length: bool,
  pub description_length: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CompetitorItem {
  pub rank: i64,
  pub title: String,
  pub description: String,
  pub url: String,
  pub source: CompetitorSource,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CompetitorSource {
  Scraped,
  SerpapiFallback,
}

/// One completed attempt, success or failure. Exactly one of `result`/`error`
/// is populated, matching `success`; the constructors below are the only way
/// the rest of the crate builds these.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct HistoryEntry {
  pub id: ID,
  pub timestamp: String,
  pub url: String,
  pub keyword: String,
  pub success: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub result: Option<MetadataData>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl HistoryEntry {
  pub fn success(url: String, keyword: String, result: MetadataData) -> Self {
    Self::success_with_id(new_id(), url, keyword, result)
  }

  pub fn success_with_id(id: ID, url: String, keyword: String, result: MetadataData) -> Self {
    HistoryEntry {
      id,
      timestamp: now_iso(),
      url,
      keyword,
      success: true,
      result: Some(result),
      error: None,
    }
  }

  pub fn failure(url: String, keyword: String, error: String) -> Self {
    HistoryEntry {
      id: new_id(),
      timestamp: now_iso(),
      url,
      keyword,
      success: false,
      result: None,
      error: Some(error),
    }
  }
}

pub fn new_id() -> ID {
  Uuid::new_v4().to_string()
}

pub fn now_iso() -> String {
  // RFC3339 without nanos; good enough for sorting/display.
  let t = time::OffsetDateTime::now_utc();
  t.format(&time::format_description::well_known::Rfc3339)
    .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

#[cfg(test)]
pub(crate) fn sample_metadata() -> MetadataData {
  MetadataData {
    url: "https://x.com".into(),
    keyword: "ab".into(),
    current: CurrentMetadata {
      title: "t".into(),
      description: "d".into(),
      title_length: None,
      description_length: None,
    },
    competitor_insight: None,
    competitors: None,
    optimized_variations: vec![],
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn metadata_round_trips_camel_case() {
    let json = r#"{
      "url": "https://shop.example.com/tees",
      "keyword": "mens tshirt",
      "current": { "title": "Tees", "description": "Buy tees.", "titleLength": 4 },
      "competitorInsight": "Competitors lead with free shipping.",
      "competitors": [
        { "rank": 1, "title": "A", "description": "B", "url": "https://a.example", "source": "scraped" },
        { "rank": 2, "title": "C", "description": "D", "url": "https://c.example", "source": "serpapi_fallback" }
      ],
      "optimizedVariations": [
        {
          "title": "Limited Stock Tees",
          "titleLength": 18,
          "description": "Order today.",
          "descriptionLength": 12,
          "strategy": "urgency",
          "meetsRequirements": { "titleLength": false, "descriptionLength": false }
        }
      ]
    }"#;

    let data: MetadataData = serde_json::from_str(json).unwrap();
    assert_eq!(data.current.title_length, Some(4));
    assert_eq!(data.current.description_length, None);
    assert_eq!(data.optimized_variations[0].strategy, Strategy::Urgency);
    let competitors = data.competitors.as_ref().unwrap();
    assert_eq!(competitors[1].source, CompetitorSource::SerpapiFallback);

    let back: MetadataData = serde_json::from_str(&serde_json::to_string(&data).unwrap()).unwrap();
    assert_eq!(back, data);
  }

  #[test]
  fn unknown_strategy_is_a_decode_error() {
    let json = r#"{
      "title": "t", "titleLength": 1,
      "description": "d", "descriptionLength": 1,
      "strategy": "fomo",
      "meetsRequirements": { "titleLength": true, "descriptionLength": true }
    }"#;
    assert!(serde_json::from_str::<VariationItem>(json).is_err());
  }

  #[test]
  fn constructors_populate_exactly_one_outcome() {
    let ok = HistoryEntry::success("https://x.com".into(), "ab".into(), sample_metadata());
    assert!(ok.success);
    assert!(ok.result.is_some());
    assert!(ok.error.is_none());

    let bad = HistoryEntry::failure("https://x.com".into(), "ab".into(), "boom".into());
    assert!(!bad.success);
    assert!(bad.result.is_none());
    assert_eq!(bad.error.as_deref(), Some("boom"));
  }

  #[test]
  fn ids_do_not_collide_in_rapid_succession() {
    let a = HistoryEntry::failure("https://x.com".into(), "ab".into(), "e".into());
    let b = HistoryEntry::failure("https://x.com".into(), "ab".into(), "e".into());
    assert_ne!(a.id, b.id);
  }
}
