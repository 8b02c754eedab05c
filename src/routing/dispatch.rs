//! Front-controller dispatch.
//!
//! Splits a resolved path into the controller, action and ordered parameter
//! list a handler is invoked with, and composes links back into the
//! application.
//!
//! ```text
//! "catalog/show/cat/sub"  →  controller "catalog", action "show", params ["cat", "sub"]
//! "catalog"               →  controller "catalog", action <default>, params []
//! ""                      →  controller <default>, action <default>, params []
//! ```

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Where a request is dispatched to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dispatch {
    pub controller: String,
    pub action: String,
    pub params: Vec<String>,
}

impl Dispatch {
    /// Split `path` on `/`.
    ///
    /// An empty path dispatches to `default_controller`; a missing or empty
    /// second segment falls back to `default_action`. Everything after the
    /// action is passed through as parameters, empty segments included.
    pub fn from_path(path: &str, default_controller: &str, default_action: &str) -> Self {
        let path = path.strip_prefix('/').unwrap_or(path);
        let path = if path.is_empty() { default_controller } else { path };

        let mut segments = path.split('/');
        let controller = segments.next().unwrap_or_default().to_string();
        let action = match segments.next() {
            Some(action) if !action.is_empty() => action,
            _ => default_action,
        }
        .to_string();
        let params = segments.map(str::to_string).collect();

        Self {
            controller,
            action,
            params,
        }
    }
}

/// Composes absolute links from the configured base URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkBuilder {
    base: String,
    named: BTreeMap<String, String>,
}

impl LinkBuilder {
    /// A non-empty base always ends in `/`.
    pub fn new(base_url: &str) -> Self {
        let mut base = base_url.to_string();
        if !base.is_empty() && !base.ends_with('/') {
            base.push('/');
        }
        Self {
            base,
            named: BTreeMap::new(),
        }
    }

    /// Attach named links, returned verbatim by [`LinkBuilder::named`].
    pub fn with_named(mut self, named: BTreeMap<String, String>) -> Self {
        self.named = named;
        self
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// `base + controller[/action][/params...]`; an empty action is omitted.
    pub fn link_to<S: AsRef<str>>(&self, controller: &str, action: &str, params: &[S]) -> String {
        let mut link = self.base.clone();
        link.push_str(controller);
        if !action.is_empty() {
            link.push('/');
            link.push_str(action);
        }
        for param in params {
            link.push('/');
            link.push_str(param.as_ref());
        }
        link
    }

    pub fn link_to_dispatch(&self, dispatch: &Dispatch) -> String {
        self.link_to(&dispatch.controller, &dispatch.action, &dispatch.params)
    }

    /// A configured named link. The base URL is not applied.
    pub fn named(&self, name: &str) -> Option<&str> {
        self.named.get(name).map(String::as_str)
    }

    pub fn named_links(&self) -> impl Iterator<Item = (&str, &str)> {
        self.named.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// Applied in order. Patterns are literals, so compilation cannot fail.
static SLUG_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"<[^>]*>", ""),
        (r"&#\d+?;", ""),
        (r"&\S+?;", ""),
        (r"\s+", "-"),
        (r"(?i)[^a-z0-9\-._]", ""),
        (r"-+", "-"),
        (r"\.+$", ""),
    ]
    .into_iter()
    .filter_map(|(pattern, replacement)| Some((Regex::new(pattern).ok()?, replacement)))
    .collect()
});

/// Turn a title into a URL segment.
///
/// Markup and HTML entities are removed, whitespace runs become `-`, and
/// anything outside `[A-Za-z0-9._-]` is dropped.
///
/// ```text
/// "Hello <b>World</b>!"  →  "Hello-World"
/// "Rust &amp; Tokio..."   →  "Rust-Tokio"
/// ```
pub fn slugify(title: &str, lowercase: bool) -> String {
    let mut slug = title.to_string();
    for (pattern, replacement) in SLUG_RULES.iter() {
        slug = pattern.replace_all(&slug, *replacement).into_owned();
    }
    if lowercase {
        slug = slug.to_lowercase();
    }
    slug.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_path() {
        let d = Dispatch::from_path("catalog/show/cat/sub", "home", "index");
        assert_eq!(d.controller, "catalog");
        assert_eq!(d.action, "show");
        assert_eq!(d.params, vec!["cat", "sub"]);
    }

    #[test]
    fn test_defaults() {
        let d = Dispatch::from_path("", "home", "index");
        assert_eq!(
            d,
            Dispatch {
                controller: "home".into(),
                action: "index".into(),
                params: vec![],
            }
        );

        let d = Dispatch::from_path("users", "home", "index");
        assert_eq!(d.controller, "users");
        assert_eq!(d.action, "index");
        assert!(d.params.is_empty());
    }

    #[test]
    fn test_empty_action_segment_uses_default() {
        let d = Dispatch::from_path("users//7", "home", "index");
        assert_eq!(d.action, "index");
        assert_eq!(d.params, vec!["7"]);
    }

    #[test]
    fn test_leading_slash_ignored() {
        let d = Dispatch::from_path("/users/edit/7", "home", "index");
        assert_eq!(d.controller, "users");
        assert_eq!(d.action, "edit");
        assert_eq!(d.params, vec!["7"]);
    }

    #[test]
    fn test_link_builder() {
        let links = LinkBuilder::new("http://localhost");
        assert_eq!(links.base(), "http://localhost/");
        assert_eq!(
            links.link_to("users", "edit", &["7"]),
            "http://localhost/users/edit/7"
        );
        assert_eq!(
            links.link_to::<&str>("users", "", &[]),
            "http://localhost/users"
        );

        assert_eq!(links.named("docs"), None);

        let relative = LinkBuilder::new("");
        let d = Dispatch::from_path("blog/read/42", "home", "index");
        assert_eq!(relative.link_to_dispatch(&d), "blog/read/42");
    }

    #[test]
    fn test_named_links() {
        let mut named = BTreeMap::new();
        named.insert("docs".to_string(), "https://docs.example.com/".to_string());
        let links = LinkBuilder::new("http://localhost").with_named(named);

        assert_eq!(links.named("docs"), Some("https://docs.example.com/"));
        assert_eq!(links.named("missing"), None);
        assert_eq!(
            links.named_links().collect::<Vec<_>>(),
            vec![("docs", "https://docs.example.com/")]
        );
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Hello <b>World</b>!", false), "Hello-World");
        assert_eq!(slugify("Rust &amp; Tokio...", true), "rust-tokio");
        assert_eq!(slugify("  spaced   out  ", false), "-spaced-out-");
        assert_eq!(slugify("caf&#233; menu", false), "caf-menu");
        assert_eq!(slugify("v1.2_release notes", true), "v1.2_release-notes");
        assert_eq!(slugify("", false), "");
    }
}
