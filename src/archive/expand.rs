//! `$VAR` / `${VAR}` expansion against the build environment.

use regex::{Captures, Regex};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

static VAR_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$([A-Za-z0-9_]+|\{[A-Za-z0-9_.]+\})").expect("Invalid variable regex")
});

/// Expand variable references in `input`. Unknown variables are left as written.
pub fn expand_vars(input: &str, env: &BTreeMap<String, String>) -> String {
    VAR_REGEX
        .replace_all(input, |caps: &Captures<'_>| {
            let raw = &caps[1];
            let name = raw
                .strip_prefix('{')
                .and_then(|s| s.strip_suffix('}'))
                .unwrap_or(raw);
            match env.get(name) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Environment a build step sees: the process environment, then the
/// configured extras, then `WORKSPACE` and `BUILD_ID`.
pub fn build_environment(
    workspace: &Path,
    build_id: &str,
    extra: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut env: BTreeMap<String, String> = std::env::vars_os()
        .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
        .collect();
    env.extend(extra.iter().map(|(k, v)| (k.clone(), v.clone())));
    env.insert(
        "WORKSPACE".to_string(),
        workspace.to_string_lossy().into_owned(),
    );
    env.insert("BUILD_ID".to_string(), build_id.to_string());
    env
}
