use crate::cache::CacheKey;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatsMetric {
    Overview,
    Languages,
    Repositories,
}

impl StatsMetric {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatsMetric::Overview => "overview",
            StatsMetric::Languages => "languages",
            StatsMetric::Repositories => "repositories",
        }
    }
}

/// The GET endpoints of the metrics API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Activity,
    Repositories,
    Contributions,
    Stats(StatsMetric),
}

pub const GITHUB_PATH: &str = "/api/github";
pub const STATS_PATH: &str = "/api/github/stats";

impl Endpoint {
    pub const ALL: [Endpoint; 6] = [
        Endpoint::Activity,
        Endpoint::Repositories,
        Endpoint::Contributions,
        Endpoint::Stats(StatsMetric::Overview),
        Endpoint::Stats(StatsMetric::Languages),
        Endpoint::Stats(StatsMetric::Repositories),
    ];

    /// Path and query relative to the API base.
    pub fn path(&self) -> String {
        match self {
            Endpoint::Activity => format!("{}?type=activity", GITHUB_PATH),
            Endpoint::Repositories => format!("{}?type=repositories", GITHUB_PATH),
            Endpoint::Contributions => format!("{}?type=contributions", GITHUB_PATH),
            Endpoint::Stats(metric) => format!("{}?metric={}", STATS_PATH, metric.as_str()),
        }
    }

    pub fn key(&self) -> CacheKey {
        CacheKey::new(self.path())
    }

    pub fn name(&self) -> String {
        match self {
            Endpoint::Activity => "activity".to_string(),
            Endpoint::Repositories => "repositories".to_string(),
            Endpoint::Contributions => "contributions".to_string(),
            Endpoint::Stats(metric) => format!("stats:{}", metric.as_str()),
        }
    }
}

impl std::str::FromStr for Endpoint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "activity" => Ok(Endpoint::Activity),
            "repositories" | "repos" => Ok(Endpoint::Repositories),
            "contributions" => Ok(Endpoint::Contributions),
            "stats:overview" | "overview" => Ok(Endpoint::Stats(StatsMetric::Overview)),
            "stats:languages" | "languages" => Ok(Endpoint::Stats(StatsMetric::Languages)),
            "stats:repositories" => Ok(Endpoint::Stats(StatsMetric::Repositories)),
            other => Err(Error::UnknownEndpoint(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        assert_eq!(Endpoint::Activity.path(), "/api/github?type=activity");
        assert_eq!(
            Endpoint::Stats(StatsMetric::Languages).path(),
            "/api/github/stats?metric=languages"
        );
        assert_eq!(Endpoint::Contributions.key().as_str(), "/api/github?type=contributions");
    }

    #[test]
    fn test_parse_names_round_trip() {
        for endpoint in Endpoint::ALL {
            assert_eq!(endpoint.name().parse::<Endpoint>().unwrap(), endpoint);
        }
        assert!("followers".parse::<Endpoint>().is_err());
    }
}
