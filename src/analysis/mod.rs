pub mod coding_activity;
pub mod heatmap;
pub mod languages;
pub mod normalizer;
pub mod numeric;
pub mod repository_insights;

pub use coding_activity::{calculate_coding_activity, calculate_coding_activity_in};
pub use heatmap::{build_heatmap, heatmap_level, summarize_contributions};
pub use languages::{language_counts, language_distribution, LanguagePalette};
pub use normalizer::{normalize_activity, sort_by_repository, sort_by_timestamp_desc};
pub use numeric::{percentage, round_one_decimal};
pub use repository_insights::{calculate_repository_insights, calculate_repository_insights_at};
