//! Page navigation.
//!
//! Five flat logical pages map one-to-one onto URL paths. [`History`] models
//! the browser's session history so back/forward behaviour can be reasoned
//! about (and tested) without a browser.

use core::fmt;

use serde::{Deserialize, Serialize};

/// A logical page of the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    #[default]
    Home,
    SignIn,
    SignUp,
    Checkout,
    About,
}

impl Page {
    /// Every page, in menu order.
    pub const ALL: [Self; 5] = [
        Self::Home,
        Self::SignIn,
        Self::SignUp,
        Self::Checkout,
        Self::About,
    ];

    /// Canonical URL path: `/` for home, `/{page}` otherwise.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::SignIn => "/signin",
            Self::SignUp => "/signup",
            Self::Checkout => "/checkout",
            Self::About => "/about",
        }
    }

    /// Parse a URL path (without base prefix). Unknown paths map to home.
    ///
    /// Matching is exact, so `/about/` is home, the same as the router's
    /// fallback.
    #[must_use]
    pub fn from_path(path: &str) -> Self {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        Self::ALL
            .into_iter()
            .find(|page| *page != Self::Home && page.path() == path)
            .unwrap_or(Self::Home)
    }

    /// Human-readable page title.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::SignIn => "Sign In",
            Self::SignUp => "Sign Up",
            Self::Checkout => "Checkout",
            Self::About => "About",
        }
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Deployment base path prefix, e.g. `/` or `/shop`.
///
/// Stored without a trailing slash (except for the root).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePath(String);

impl BasePath {
    /// Normalize a base path. Empty input is treated as `/`.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim().trim_matches('/');
        if trimmed.is_empty() {
            Self("/".to_string())
        } else {
            Self(format!("/{trimmed}"))
        }
    }

    /// The normalized prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the root prefix.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Prefix an absolute application path.
    #[must_use]
    pub fn join(&self, path: &str) -> String {
        if self.is_root() {
            return path.to_string();
        }
        if path == "/" {
            format!("{}/", self.0)
        } else {
            format!("{}{path}", self.0)
        }
    }

    /// URL for a page.
    #[must_use]
    pub fn href(&self, page: Page) -> String {
        self.join(page.path())
    }

    /// Strip the prefix from a request path. Paths outside the prefix are
    /// returned unchanged (and will resolve to home).
    #[must_use]
    pub fn strip<'a>(&self, path: &'a str) -> &'a str {
        if self.is_root() {
            return path;
        }
        match path.strip_prefix(self.0.as_str()) {
            Some("") => "/",
            Some(rest) if rest.starts_with('/') => rest,
            _ => path,
        }
    }

    /// Resolve a full request path to a page.
    #[must_use]
    pub fn page_for(&self, path: &str) -> Page {
        Page::from_path(self.strip(path))
    }
}

impl Default for BasePath {
    fn default() -> Self {
        Self::new("/")
    }
}

/// A completed page change.
///
/// Every transition scrolls the viewport to the top; the scroll
/// orchestrator is attached only while home is current.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Page,
    pub to: Page,
}

impl Transition {
    /// Whether this transition enters `page` from somewhere else.
    #[must_use]
    pub fn enters(&self, page: Page) -> bool {
        self.to == page && self.from != page
    }

    /// Whether this transition leaves `page`.
    #[must_use]
    pub fn leaves(&self, page: Page) -> bool {
        self.from == page && self.to != page
    }
}

/// Browser session history: a list of URLs and a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    base: BasePath,
    entries: Vec<String>,
    cursor: usize,
    current: Page,
}

impl History {
    /// Start a history at the URL the visitor landed on.
    #[must_use]
    pub fn new(base: BasePath, initial_url: &str) -> Self {
        let current = base.page_for(initial_url);
        Self {
            base,
            entries: vec![initial_url.to_string()],
            cursor: 0,
            current,
        }
    }

    /// The current page.
    #[must_use]
    pub const fn current(&self) -> Page {
        self.current
    }

    /// The current URL.
    #[must_use]
    pub fn current_url(&self) -> &str {
        self.entries
            .get(self.cursor)
            .map_or_else(|| self.base.as_str(), String::as_str)
    }

    /// Whether `back` would move.
    #[must_use]
    pub const fn can_go_back(&self) -> bool {
        self.cursor > 0
    }

    /// Whether `forward` would move.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Push a new entry for `page` and make it current.
    ///
    /// Forward entries are discarded, as a browser does on `pushState`.
    pub fn navigate(&mut self, page: Page) -> Transition {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(self.base.href(page));
        self.cursor = self.entries.len() - 1;
        self.settle(page)
    }

    /// Move back one entry without pushing, re-deriving the page from its URL.
    pub fn back(&mut self) -> Option<Transition> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor -= 1;
        Some(self.rederive())
    }

    /// Move forward one entry without pushing.
    pub fn forward(&mut self) -> Option<Transition> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor += 1;
        Some(self.rederive())
    }

    /// Handle a browser-initiated history change to `url`.
    ///
    /// The current entry's URL is replaced and state is re-derived from it;
    /// no entry is pushed.
    pub fn pop_state(&mut self, url: &str) -> Transition {
        if let Some(entry) = self.entries.get_mut(self.cursor) {
            url.clone_into(entry);
        }
        self.rederive()
    }

    fn rederive(&mut self) -> Transition {
        let page = self.base.page_for(self.current_url());
        self.settle(page)
    }

    fn settle(&mut self, page: Page) -> Transition {
        let from = self.current;
        self.current = page;
        Transition { from, to: page }
    }
}
