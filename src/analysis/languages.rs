use std::collections::{BTreeMap, HashMap};

use crate::analysis::numeric::apportion_percentages;
use crate::models::repository::{LanguageStat, RepositorySummary};

pub const FALLBACK_COLOR: &str = "#8b8b8b";

/// Display colors for languages, keyed case-insensitively.
pub struct LanguagePalette {
    colors: HashMap<String, &'static str>,
    aliases: HashMap<String, String>,
}

impl LanguagePalette {
    pub fn new() -> Self {
        let mut palette = Self {
            colors: HashMap::new(),
            aliases: HashMap::new(),
        };

        let languages: [(&str, &'static str, &[&str]); 30] = [
            ("Rust", "#dea584", &["rs"]),
            ("TypeScript", "#3178c6", &["ts", "tsx"]),
            ("JavaScript", "#f1e05a", &["js", "jsx", "ecmascript"]),
            ("Python", "#3572a5", &["py"]),
            ("Go", "#00add8", &["golang"]),
            ("Java", "#b07219", &[]),
            ("Kotlin", "#a97bff", &["kt"]),
            ("Swift", "#f05138", &[]),
            ("C", "#555555", &[]),
            ("C++", "#f34b7d", &["cpp"]),
            ("C#", "#178600", &["csharp", "cs"]),
            ("Ruby", "#701516", &["rb"]),
            ("PHP", "#4f5d95", &[]),
            ("Scala", "#c22d40", &[]),
            ("Haskell", "#5e5086", &["hs"]),
            ("Elixir", "#6e4a7e", &["ex"]),
            ("Dart", "#00b4ab", &[]),
            ("Lua", "#000080", &[]),
            ("Shell", "#89e051", &["bash", "sh", "zsh"]),
            ("PowerShell", "#012456", &["ps1"]),
            ("HTML", "#e34c26", &["htm"]),
            ("CSS", "#563d7c", &[]),
            ("SCSS", "#c6538c", &["sass"]),
            ("Vue", "#41b883", &[]),
            ("Svelte", "#ff3e00", &[]),
            ("MDX", "#fcb32c", &[]),
            ("Jupyter Notebook", "#da5b0b", &["ipynb"]),
            ("Dockerfile", "#384d54", &["docker"]),
            ("Solidity", "#aa6746", &["sol"]),
            ("Zig", "#ec915c", &[]),
        ];

        for (name, color, aliases) in languages {
            palette.add(name, color, aliases);
        }

        palette
    }

    fn add(&mut self, name: &str, color: &'static str, aliases: &[&str]) {
        self.colors.insert(name.to_lowercase(), color);
        for alias in aliases {
            self.aliases.insert(alias.to_lowercase(), name.to_lowercase());
        }
    }

    pub fn color(&self, language: &str) -> &'static str {
        let lower = language.to_lowercase();
        let key = self.aliases.get(&lower).unwrap_or(&lower);
        self.colors.get(key).copied().unwrap_or(FALLBACK_COLOR)
    }
}

impl Default for LanguagePalette {
    fn default() -> Self {
        Self::new()
    }
}

/// Share of each language, largest first (name ascending on equal values).
/// Zero-valued languages are dropped; the rounded shares sum to 100.0.
pub fn language_distribution(totals: &BTreeMap<String, u64>) -> Vec<LanguageStat> {
    let palette = LanguagePalette::new();

    let mut entries: Vec<(&String, u64)> = totals
        .iter()
        .filter(|(_, &value)| value > 0)
        .map(|(name, &value)| (name, value))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    let values: Vec<u64> = entries.iter().map(|(_, v)| *v).collect();
    let shares = apportion_percentages(&values);

    entries
        .into_iter()
        .zip(shares)
        .map(|((name, value), percentage)| LanguageStat {
            name: name.clone(),
            value,
            percentage,
            color: palette.color(name).to_string(),
        })
        .collect()
}

/// Counts repositories per primary language; repositories without one are skipped.
pub fn language_counts(repositories: &[RepositorySummary]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for language in repositories.iter().filter_map(|r| r.language.as_deref()) {
        if language.is_empty() {
            continue;
        }
        *counts.entry(language.to_string()).or_insert(0) += 1;
    }
    counts
}
