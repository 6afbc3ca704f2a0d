//! Browser boundary.
//!
//! Everything the front end touches in the browser goes through these
//! traits: the cookie jar, local storage, the document, blocking dialogs,
//! the location bar, the OS colour-scheme query and the clock. Logic above
//! this layer is plain Rust over explicit state and runs unchanged against
//! [`HeadlessBrowser`] in tests and the real page under the `web` feature.

use chrono::{DateTime, Utc};

pub mod headless;
#[cfg(feature = "web")]
pub mod web;

pub use headless::{HeadlessBrowser, NodeId};
#[cfg(feature = "web")]
pub use web::WebBrowser;

/// `document.cookie`-shaped access: reads return `name=value` pairs joined
/// by `"; "`, writes take one full cookie assignment with attributes.
pub trait CookieJar {
    fn cookie_string(&self) -> String;
    fn write_cookie(&mut self, assignment: &str);
}

/// `localStorage`-shaped access.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&mut self, key: &str, value: &str);
    fn remove_item(&mut self, key: &str);
}

pub trait Dialogs {
    fn alert(&mut self, message: &str);
    /// True when the user accepted.
    fn confirm(&mut self, message: &str) -> bool;
}

pub trait Location {
    /// Path component of the current URL, e.g. `/admin/questions`.
    fn pathname(&self) -> String;
    /// Query string of the current URL including the leading `?`, or empty.
    fn search(&self) -> String;
    fn assign(&mut self, url: &str);
}

pub trait ColorScheme {
    fn prefers_dark(&self) -> bool;
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// The subset of CSS selectors the front end needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selector<'a> {
    Class(&'a str),
    Id(&'a str),
    /// Anchors whose `href` attribute starts with the prefix.
    HrefPrefix(&'a str),
}

impl Selector<'_> {
    pub fn to_css(&self) -> String {
        match self {
            Selector::Class(class) => format!(".{}", class),
            Selector::Id(id) => format!("#{}", id),
            Selector::HrefPrefix(prefix) => format!("a[href^=\"{}\"]", prefix),
        }
    }
}

/// Document access through opaque node handles.
///
/// Lookups return `None`/empty when the page lacks the element; callers
/// never treat a missing element as an error.
pub trait Dom {
    type Node: Clone;

    fn body(&self) -> Option<Self::Node>;
    fn query_all(&self, selector: &Selector<'_>) -> Vec<Self::Node>;
    /// First descendant of `parent` matching the selector.
    fn query_within(&self, parent: &Self::Node, selector: &Selector<'_>) -> Option<Self::Node>;
    fn query_all_within(&self, parent: &Self::Node, selector: &Selector<'_>) -> Vec<Self::Node>;
    fn by_id(&self, id: &str) -> Option<Self::Node>;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&mut self, node: &Self::Node, class: &str);
    fn remove_class(&mut self, node: &Self::Node, class: &str);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str);

    /// Sets `style.display`; `None` clears the inline value.
    fn set_display(&mut self, node: &Self::Node, display: Option<&str>);

    fn text(&self, node: &Self::Node) -> String;
    fn set_text(&mut self, node: &Self::Node, text: &str);
    fn set_inner_html(&mut self, node: &Self::Node, html: &str);

    /// Appends a `<button>` to the body.
    fn append_button(
        &mut self,
        class: &str,
        aria_label: &str,
        inner_html: &str,
    ) -> Option<Self::Node>;
    fn remove(&mut self, node: &Self::Node);

    /// Replaces one class with another on the same element.
    fn swap_class(&mut self, node: &Self::Node, from: &str, to: &str) {
        self.remove_class(node, from);
        self.add_class(node, to);
    }
}

/// Everything a page needs from its host.
pub trait Browser:
    CookieJar + KeyValueStorage + Dom + Dialogs + Location + ColorScheme + Clock
{
}

impl<T> Browser for T where
    T: CookieJar + KeyValueStorage + Dom + Dialogs + Location + ColorScheme + Clock
{
}

/// A key press reduced to what shortcuts look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn plain(key: &str) -> Self {
        Self {
            key: key.to_string(),
            ctrl: false,
            meta: false,
        }
    }

    pub fn ctrl(key: &str) -> Self {
        Self {
            ctrl: true,
            ..Self::plain(key)
        }
    }

    pub fn meta(key: &str) -> Self {
        Self {
            meta: true,
            ..Self::plain(key)
        }
    }
}
