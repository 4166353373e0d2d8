use serde::Serialize;

/// Per-field validation verdicts for the submit gate. Touched/untouched
/// display logic stays in the frontend; this is only the predicate.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
  pub url_valid: bool,
  pub keyword_valid: bool,
  pub can_submit: bool,
}

pub fn url_is_valid(url: &str) -> bool {
  let trimmed = url.trim();
  trimmed.starts_with("http://") || trimmed.starts_with("https://")
}

pub fn keyword_is_valid(keyword: &str) -> bool {
  keyword.trim().chars().count() >= 2
}

pub fn check(url: &str, keyword: &str) -> ValidationReport {
  let url_valid = url_is_valid(url);
  let keyword_valid = keyword_is_valid(keyword);
  ValidationReport {
    url_valid,
    keyword_valid,
    can_submit: url_valid && keyword_valid,
  }
}
