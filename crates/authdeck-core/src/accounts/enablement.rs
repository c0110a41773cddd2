//! Provider enablement encoded in the model exclusion list
//!
//! A provider entry has no enabled flag of its own. It is disabled when its
//! `excluded_models` list contains one of the disable-all sentinels. The
//! sentinels stay private to this module; callers only ever see a `bool`.

/// Sentinel inserted when disabling an entry
const DISABLE_ALL_MODELS: &str = "all";

/// Alternative sentinel accepted from the remote side
const DISABLE_ALL_WILDCARD: &str = "*";

fn is_sentinel(model: &str) -> bool {
    model == DISABLE_ALL_MODELS || model == DISABLE_ALL_WILDCARD
}

/// Whether an entry with this exclusion list is enabled
///
/// Absent lists are enabled. Matching is exact: `"ALL"` or `"gpt-*"` do not
/// disable anything.
pub fn is_enabled(excluded_models: Option<&[String]>) -> bool {
    match excluded_models {
        None => true,
        Some(models) => !models.iter().any(|m| is_sentinel(m)),
    }
}

/// New exclusion list that disables every model
///
/// Existing entries keep their order; `"all"` is appended once. Input that
/// already carries `"all"` is returned as is.
pub fn with_disable_all_models_rule(excluded_models: Option<&[String]>) -> Vec<String> {
    let mut next = excluded_models.map(<[String]>::to_vec).unwrap_or_default();
    if !next.iter().any(|m| m == DISABLE_ALL_MODELS) {
        next.push(DISABLE_ALL_MODELS.to_string());
    }
    next
}

/// New exclusion list with both sentinels removed
pub fn without_disable_all_models_rule(excluded_models: Option<&[String]>) -> Vec<String> {
    excluded_models
        .unwrap_or_default()
        .iter()
        .filter(|m| !is_sentinel(m))
        .cloned()
        .collect()
}

/// Exclusion list for the requested state
pub fn apply(excluded_models: Option<&[String]>, enabled: bool) -> Vec<String> {
    if enabled {
        without_disable_all_models_rule(excluded_models)
    } else {
        with_disable_all_models_rule(excluded_models)
    }
}
