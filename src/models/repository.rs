use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Public metadata for one repository. Accepts both the API route's camelCase
/// names and GitHub's own snake_case names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RepositorySummary {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, alias = "stargazers_count", alias = "stargazersCount")]
    pub stars: u64,
    #[serde(default, alias = "forks_count", alias = "forksCount")]
    pub forks: u64,
    /// Size in KB, as GitHub reports it.
    #[serde(default, rename = "size")]
    pub size_kb: u64,
    #[serde(alias = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(alias = "updated_at")]
    pub updated_at: DateTime<Utc>,
    #[serde(default, alias = "html_url")]
    pub url: Option<String>,
}

/// The `stats?metric=overview` payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct OverviewStats {
    #[serde(default, alias = "totalRepos", alias = "public_repos", alias = "publicRepos")]
    pub total_repositories: u64,
    #[serde(default)]
    pub total_stars: u64,
    #[serde(default)]
    pub total_forks: u64,
    #[serde(default)]
    pub followers: u64,
    #[serde(default)]
    pub following: u64,
    #[serde(default)]
    pub total_commits: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageStat {
    pub name: String,
    /// Bytes or repository count, whichever the source aggregated.
    pub value: u64,
    pub percentage: f64,
    pub color: String,
}

/// The `stats?metric=languages` payload: either a `{language: bytes}` map or a
/// list of `{name, value}` records.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum LanguageTotals {
    Map(BTreeMap<String, u64>),
    List(Vec<LanguageTotal>),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LanguageTotal {
    pub name: String,
    #[serde(default, alias = "bytes", alias = "count", alias = "size")]
    pub value: u64,
}

impl LanguageTotals {
    /// Folds into a per-language map; repeated names are summed.
    pub fn into_map(self) -> BTreeMap<String, u64> {
        match self {
            LanguageTotals::Map(map) => map,
            LanguageTotals::List(list) => {
                let mut map = BTreeMap::new();
                for entry in list {
                    *map.entry(entry.name).or_insert(0) += entry.value;
                }
                map
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_totals_both_shapes() {
        let map: LanguageTotals = serde_json::from_str(r#"{"Rust": 300, "Go": 100}"#).unwrap();
        assert_eq!(map.into_map().get("Rust"), Some(&300));

        let list: LanguageTotals = serde_json::from_str(
            r#"[{"name": "Rust", "bytes": 300}, {"name": "Rust", "value": 5}, {"name": "Go", "count": 1}]"#,
        )
        .unwrap();
        let map = list.into_map();
        assert_eq!(map.get("Rust"), Some(&305));
        assert_eq!(map.get("Go"), Some(&1));
    }

    #[test]
    fn test_accepts_github_field_names() {
        let json = r#"{
            "name": "ghpulse",
            "language": "Rust",
            "stargazers_count": 12,
            "forks_count": 3,
            "size": 2048,
            "created_at": "2024-01-01T00:00:00Z",
            "updated_at": "2024-06-01T00:00:00Z",
            "html_url": "https://github.com/octo/ghpulse"
        }"#;
        let repo: RepositorySummary = serde_json::from_str(json).unwrap();
        assert_eq!(repo.stars, 12);
        assert_eq!(repo.forks, 3);
        assert_eq!(repo.size_kb, 2048);
        assert_eq!(repo.url.as_deref(), Some("https://github.com/octo/ghpulse"));
    }

    #[test]
    fn test_accepts_camel_case_names() {
        let json = r#"{
            "name": "site",
            "stars": 4,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        }"#;
        let repo: RepositorySummary = serde_json::from_str(json).unwrap();
        assert_eq!(repo.stars, 4);
        assert_eq!(repo.forks, 0);
        assert_eq!(repo.language, None);
    }

    #[test]
    fn test_overview_defaults() {
        let stats: OverviewStats = serde_json::from_str(r#"{"totalRepos": 9}"#).unwrap();
        assert_eq!(stats.total_repositories, 9);
        assert_eq!(stats.total_commits, None);
    }
}
