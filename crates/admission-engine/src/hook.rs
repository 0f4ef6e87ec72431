//! Repository hook admission: changed-path and git-ref filters.

use regex::Regex;

use admission_types::{HookEvent, HookFilter};

use crate::glob::GlobPattern;

/// Returns `true` if any changed path matches any configured regex.
///
/// No configured pattern means no restriction. With patterns configured but no
/// changed paths there is nothing to admit. Patterns that fail to compile are
/// logged and skipped.
pub fn is_valid_hook_path(configured_paths: &[String], paths: &[String]) -> bool {
    if configured_paths.is_empty() {
        return true;
    }
    if paths.is_empty() {
        return false;
    }

    let patterns: Vec<Regex> = configured_paths
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::warn!(pattern = %p, error = %e, "Skipping invalid hook path pattern");
                None
            }
        })
        .collect();

    paths
        .iter()
        .any(|path| patterns.iter().any(|re| re.is_match(path)))
}

/// Returns `true` if `current_ref` matches the configured ref globs, joined
/// into one alternation. No configured ref means no restriction; a pattern
/// that fails to compile is logged and rejects the ref.
pub fn is_valid_hook_refs(configured_refs: &[String], current_ref: &str) -> bool {
    if configured_refs.is_empty() {
        return true;
    }

    let joined = configured_refs.join(" ");
    match GlobPattern::new(&joined) {
        Ok(glob) => glob.is_match(current_ref),
        Err(e) => {
            tracing::warn!(pattern = %joined, error = %e, "Invalid hook ref pattern");
            false
        }
    }
}

const BRANCH_PREFIX: &str = "refs/heads/";
const TAG_PREFIX: &str = "refs/tags/";

/// Check a git ref against the branch and tag filters of a hook.
///
/// With neither filter set every ref passes. A branch ref is matched, prefix
/// stripped, against the branch filter unless only tag filters are set; any
/// other ref is matched against the tag filter unless only branch filters are
/// set.
pub fn validate_ref(filter: &HookFilter, git_ref: &str) -> bool {
    if filter.branches.is_empty() && filter.tags.is_empty() {
        return true;
    }

    match git_ref.strip_prefix(BRANCH_PREFIX) {
        Some(branch) => {
            (!filter.branches.is_empty() || filter.tags.is_empty())
                && is_valid_hook_refs(&filter.branches, branch)
        }
        None => {
            let tag = git_ref.strip_prefix(TAG_PREFIX).unwrap_or(git_ref);
            (filter.branches.is_empty() || !filter.tags.is_empty())
                && is_valid_hook_refs(&filter.tags, tag)
        }
    }
}

/// Admit a repository event when its changed paths, its full ref and its
/// branch or tag all pass.
pub fn admits(filter: &HookFilter, event: &HookEvent) -> bool {
    let admitted = is_valid_hook_path(&filter.paths, &event.changed_paths)
        && is_valid_hook_refs(&filter.refs, &event.git_ref)
        && validate_ref(filter, &event.git_ref);
    tracing::debug!(git_ref = %event.git_ref, admitted, "Hook filter evaluated");
    admitted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn no_path_restriction() {
        assert!(is_valid_hook_path(&[], &[]));
        assert!(is_valid_hook_path(&[], &strings(&["anything"])));
    }

    #[test]
    fn restriction_without_changes_rejects() {
        assert!(!is_valid_hook_path(&strings(&["^src/"]), &[]));
    }

    #[test]
    fn any_path_matching_any_pattern() {
        let configured = strings(&["^src/", r"\.proto$"]);
        assert!(is_valid_hook_path(&configured, &strings(&["src/main.go"])));
        assert!(is_valid_hook_path(&configured, &strings(&["doc/readme.md", "api/v1.proto"])));
        assert!(!is_valid_hook_path(&configured, &strings(&["doc/readme.md"])));
    }

    #[test]
    fn invalid_path_pattern_is_skipped() {
        let configured = strings(&["(broken", "^src/"]);
        assert!(is_valid_hook_path(&configured, &strings(&["src/lib.rs"])));
        assert!(!is_valid_hook_path(&strings(&["(broken"]), &strings(&["src/lib.rs"])));
    }

    #[test]
    fn refs() {
        assert!(is_valid_hook_refs(&[], "refs/heads/main"));
        assert!(is_valid_hook_refs(&strings(&["refs/heads/release-*"]), "refs/heads/release-1.2"));
        assert!(!is_valid_hook_refs(&strings(&["refs/heads/release-*"]), "refs/heads/main"));
        assert!(is_valid_hook_refs(
            &strings(&["refs/heads/main", "refs/tags/*"]),
            "refs/tags/v2"
        ));
    }

    #[test]
    fn unclosed_brace_in_ref_filter_is_literal() {
        assert!(is_valid_hook_refs(&strings(&["refs/heads/feat{1"]), "refs/heads/feat{1"));
    }

    #[test]
    fn invalid_ref_glob_rejects() {
        assert!(!is_valid_hook_refs(&strings(&["refs/heads/[main"]), "refs/heads/main"));
    }

    #[test]
    fn filter_combines_paths_and_refs() {
        let filter = HookFilter {
            paths: strings(&["^src/"]),
            refs: strings(&["refs/heads/main"]),
            ..HookFilter::default()
        };
        let event = HookEvent {
            git_ref: "refs/heads/main".into(),
            changed_paths: strings(&["src/main.rs"]),
        };
        assert!(admits(&filter, &event));

        let other_branch = HookEvent {
            git_ref: "refs/heads/dev".into(),
            ..event.clone()
        };
        assert!(!admits(&filter, &other_branch));

        assert!(admits(&HookFilter::default(), &HookEvent::default()));
    }

    fn ref_filter(branches: &[&str], tags: &[&str]) -> HookFilter {
        HookFilter {
            branches: strings(branches),
            tags: strings(tags),
            ..HookFilter::default()
        }
    }

    #[test]
    fn no_branch_or_tag_filter_admits_every_ref() {
        let filter = ref_filter(&[], &[]);
        assert!(validate_ref(&filter, "refs/heads/main"));
        assert!(validate_ref(&filter, "refs/tags/v1.0"));
    }

    #[test]
    fn branch_filter_only() {
        let filter = ref_filter(&["main", "release/*"], &[]);
        assert!(validate_ref(&filter, "refs/heads/main"));
        assert!(validate_ref(&filter, "refs/heads/release/1.2"));
        assert!(!validate_ref(&filter, "refs/heads/dev"));
        assert!(!validate_ref(&filter, "refs/tags/v1.0"));
    }

    #[test]
    fn tag_filter_only() {
        let filter = ref_filter(&[], &["v*"]);
        assert!(validate_ref(&filter, "refs/tags/v1.0"));
        assert!(!validate_ref(&filter, "refs/tags/nightly"));
        assert!(!validate_ref(&filter, "refs/heads/main"));
    }

    #[test]
    fn branch_and_tag_filters() {
        let filter = ref_filter(&["main"], &["v*"]);
        assert!(validate_ref(&filter, "refs/heads/main"));
        assert!(!validate_ref(&filter, "refs/heads/dev"));
        assert!(validate_ref(&filter, "refs/tags/v2"));
        assert!(!validate_ref(&filter, "refs/tags/nightly"));
    }

    #[test]
    fn admits_applies_branch_and_tag_filters() {
        let filter = ref_filter(&[], &["v*"]);
        let tag_push = HookEvent {
            git_ref: "refs/tags/v3".into(),
            changed_paths: Vec::new(),
        };
        let branch_push = HookEvent {
            git_ref: "refs/heads/main".into(),
            changed_paths: Vec::new(),
        };
        assert!(admits(&filter, &tag_push));
        assert!(!admits(&filter, &branch_push));
    }
}
