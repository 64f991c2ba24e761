//! Membership check and path-template expansion.

use crate::types::DeploymentContext;

/// Returns `true` if `url` is already one of the client's allowed origins.
///
/// Comparison is byte-exact: `https://a.example` and `https://a.example/`
/// are different entries.
pub fn is_registered(allowed_clients: &[String], url: &str) -> bool {
    allowed_clients.iter().any(|entry| entry == url)
}

/// Joins `base` with every fragment of a comma-separated template list.
///
/// Fragments are used verbatim, without trimming, and keep their order. An
/// absent base yields no URLs whatever the templates contain.
pub fn expand_urls(base: Option<&str>, templates: &str) -> Vec<String> {
    let Some(base) = base else {
        return Vec::new();
    };
    templates
        .split(',')
        .map(|fragment| format!("{base}/{fragment}"))
        .collect()
}

/// Expands `templates` against the primary URL, then the secondary URL.
pub fn expand_urls_for(context: &DeploymentContext, templates: &str) -> Vec<String> {
    let mut urls = expand_urls(Some(context.primary_url()), templates);
    urls.extend(expand_urls(context.secondary_url(), templates));
    urls
}
