// PoolWatch - core/filter.rs
//
// Model filter: the set of selectable model names and selection validity.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::KeyStat;
use crate::util::constants::ALL_MODELS;
use std::collections::HashSet;

/// Derive the selectable model names from a key-statistics list.
///
/// Always starts with the `"all"` sentinel, followed by every model name
/// found in any key's `model_stats`, in first-seen order without duplicates.
/// The sentinel is present even for an empty list.
pub fn available_models(stats: &[KeyStat]) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut models = vec![ALL_MODELS.to_string()];
    seen.insert(ALL_MODELS);

    for stat in stats {
        for name in stat.model_names() {
            if seen.insert(name) {
                models.push(name.to_string());
            }
        }
    }
    models
}

/// Returns the selection to keep after the model list changed.
///
/// The current selection survives when it is still available; otherwise the
/// filter falls back to `"all"`.
pub fn revalidate_selection(selected: &str, available: &[String]) -> Option<String> {
    if available.iter().any(|m| m == selected) {
        None
    } else {
        Some(ALL_MODELS.to_string())
    }
}

/// Key statistics relevant to `selected`: everything for `"all"`, otherwise
/// only the keys that have statistics for that model.
pub fn stats_for_model<'a>(stats: &'a [KeyStat], selected: &str) -> Vec<&'a KeyStat> {
    if selected == ALL_MODELS {
        return stats.iter().collect();
    }
    stats.iter().filter(|s| s.has_model(selected)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn stat(models: &[&str]) -> KeyStat {
        let map: serde_json::Map<String, serde_json::Value> = models
            .iter()
            .map(|m| (m.to_string(), json!({ "calls": 1 })))
            .collect();
        KeyStat::new(json!({ "api_key": "k", "model_stats": map }))
    }

    fn as_set(models: &[String]) -> HashSet<&str> {
        models.iter().map(String::as_str).collect()
    }

    #[test]
    fn test_union_of_model_names_with_sentinel() {
        let stats = vec![stat(&["gpt-4"]), stat(&["claude"])];
        let models = available_models(&stats);
        assert_eq!(as_set(&models), HashSet::from(["all", "gpt-4", "claude"]));
        assert_eq!(models[0], "all");
    }

    #[test]
    fn test_empty_stats_still_contain_all() {
        assert_eq!(available_models(&[]), vec!["all".to_string()]);
    }

    #[test]
    fn test_duplicates_are_collapsed() {
        let stats = vec![stat(&["gpt-4", "claude"]), stat(&["claude", "gpt-4"]), stat(&[])];
        assert_eq!(available_models(&stats).len(), 3);
    }

    #[test]
    fn test_keys_without_model_stats_contribute_nothing() {
        let stats = vec![
            KeyStat::new(json!({ "api_key": "bare" })),
            KeyStat::new(json!(null)),
            stat(&["gemini"]),
        ];
        assert_eq!(as_set(&available_models(&stats)), HashSet::from(["all", "gemini"]));
    }

    #[test]
    fn test_model_named_all_is_not_duplicated() {
        let stats = vec![stat(&["all", "gpt-4"])];
        assert_eq!(available_models(&stats), vec!["all".to_string(), "gpt-4".to_string()]);
    }

    #[test]
    fn test_revalidate_keeps_available_selection() {
        let available = vec!["all".to_string(), "gpt-4".to_string()];
        assert_eq!(revalidate_selection("gpt-4", &available), None);
        assert_eq!(revalidate_selection("all", &available), None);
    }

    #[test]
    fn test_revalidate_resets_missing_selection() {
        let available = vec!["all".to_string(), "claude".to_string()];
        assert_eq!(
            revalidate_selection("gpt-4", &available),
            Some("all".to_string())
        );
    }

    #[test]
    fn test_stats_for_model() {
        let stats = vec![stat(&["gpt-4"]), stat(&["claude"]), stat(&["gpt-4", "claude"])];
        assert_eq!(stats_for_model(&stats, "all").len(), 3);
        assert_eq!(stats_for_model(&stats, "gpt-4").len(), 2);
        assert!(stats_for_model(&stats, "missing").is_empty());
    }
}
