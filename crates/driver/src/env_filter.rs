// SPDX-License-Identifier: MIT

//! Environment allow-listing for the runner subprocess (spec.md §4.6, §6):
//! only a small set of variable names pass through, plus a fixed set of
//! mandatory injections that disable third-party git hook installation.

/// Variable names passed through verbatim.
const ALLOWED_EXACT: &[&str] = &["PATH", "HOME", "USER", "SHELL", "LANG", "TERM", "TMPDIR", "TZ"];
/// Variable name prefixes passed through (locale overrides).
const ALLOWED_PREFIXES: &[&str] = &["LC_"];

/// Fixed environment injected into every run regardless of the host's
/// environment, so CI-oriented tooling behaves and git hook managers don't
/// fire inside the isolated checkout.
pub const MANDATORY_INJECTIONS: &[(&str, &str)] = &[
    ("CI", "true"),
    ("LEFTHOOK", "0"),
    ("HUSKY", "0"),
    ("PRE_COMMIT_ALLOW_NO_CONFIG", "1"),
];

fn is_allowed(name: &str) -> bool {
    ALLOWED_EXACT.contains(&name) || ALLOWED_PREFIXES.iter().any(|p| name.starts_with(p))
}

/// Builds the filtered environment from the current process's environment,
/// then applies the mandatory injections (which always win over an
/// allow-listed passthrough of the same name).
pub fn filtered_env() -> Vec<(String, String)> {
    filter_from(std::env::vars())
}

pub fn filter_from(vars: impl Iterator<Item = (String, String)>) -> Vec<(String, String)> {
    let mut env: Vec<(String, String)> = vars.filter(|(k, _)| is_allowed(k)).collect();
    for (k, v) in MANDATORY_INJECTIONS {
        if let Some(existing) = env.iter_mut().find(|(ek, _)| ek == k) {
            existing.1 = v.to_string();
        } else {
            env.push((k.to_string(), v.to_string()));
        }
    }
    env
}

#[cfg(test)]
#[path = "env_filter_tests.rs"]
mod tests;
