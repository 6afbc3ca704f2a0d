//! In-memory browser used by tests and the headless smoke-run binary.

use super::{Clock, ColorScheme, CookieJar, Dialogs, Dom, KeyValueStorage, Location, Selector};
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::{BTreeMap, HashMap, VecDeque};

/// Handle to an element of a [`HeadlessBrowser`] document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Default)]
struct Element {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    display: Option<String>,
    text: String,
    inner_html: String,
    parent: Option<NodeId>,
    removed: bool,
}

#[derive(Debug, Clone)]
struct StoredCookie {
    value: String,
    expires: Option<DateTime<Utc>>,
}

/// A page with no rendering: cookies honour `expires` against an adjustable
/// clock, dialogs are recorded, navigation is logged instead of performed.
pub struct HeadlessBrowser {
    now: DateTime<Utc>,
    cookies: BTreeMap<String, StoredCookie>,
    storage: BTreeMap<String, String>,
    elements: Vec<Element>,
    pathname: String,
    search: String,
    prefers_dark: bool,
    confirm_answers: VecDeque<bool>,
    pub alerts: Vec<String>,
    pub confirms: Vec<String>,
    pub navigations: Vec<String>,
}

impl Default for HeadlessBrowser {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBrowser {
    pub fn new() -> Self {
        let body = Element {
            tag: "body".to_string(),
            ..Element::default()
        };
        Self {
            now: Utc
                .with_ymd_and_hms(2024, 3, 15, 12, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
            cookies: BTreeMap::new(),
            storage: BTreeMap::new(),
            elements: vec![body],
            pathname: "/".to_string(),
            search: String::new(),
            prefers_dark: false,
            confirm_answers: VecDeque::new(),
            alerts: Vec::new(),
            confirms: Vec::new(),
            navigations: Vec::new(),
        }
    }

    /// Opens `url` (path plus optional query) as the current page.
    pub fn at(mut self, url: &str) -> Self {
        self.open(url);
        self
    }

    pub fn with_os_dark(mut self, prefers_dark: bool) -> Self {
        self.prefers_dark = prefers_dark;
        self
    }

    pub fn open(&mut self, url: &str) {
        match url.split_once('?') {
            Some((path, query)) => {
                self.pathname = path.to_string();
                self.search = format!("?{}", query);
            }
            None => {
                self.pathname = url.to_string();
                self.search.clear();
            }
        }
    }

    pub fn set_prefers_dark(&mut self, prefers_dark: bool) {
        self.prefers_dark = prefers_dark;
    }

    pub fn set_now(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }

    pub fn advance(&mut self, by: Duration) {
        self.now += by;
    }

    /// Answer for the next `confirm` call; unanswered prompts are accepted.
    pub fn queue_confirm(&mut self, accept: bool) {
        self.confirm_answers.push_back(accept);
    }

    pub fn last_navigation(&self) -> Option<&str> {
        self.navigations.last().map(String::as_str)
    }

    // --- Document building ---

    pub fn body_node(&self) -> NodeId {
        NodeId(0)
    }

    /// Appends an element under the body.
    pub fn element(&mut self, tag: &str, classes: &[&str]) -> NodeId {
        self.child(NodeId(0), tag, classes)
    }

    pub fn child(&mut self, parent: NodeId, tag: &str, classes: &[&str]) -> NodeId {
        self.elements.push(Element {
            tag: tag.to_string(),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            parent: Some(parent),
            ..Element::default()
        });
        NodeId(self.elements.len() - 1)
    }

    pub fn link(&mut self, href: &str, classes: &[&str]) -> NodeId {
        self.link_in(NodeId(0), href, classes)
    }

    pub fn link_in(&mut self, parent: NodeId, href: &str, classes: &[&str]) -> NodeId {
        let node = self.child(parent, "a", classes);
        self.elements[node.0]
            .attributes
            .insert("href".to_string(), href.to_string());
        node
    }

    pub fn with_id(&mut self, node: NodeId, id: &str) -> NodeId {
        if let Some(el) = self.elements.get_mut(node.0) {
            el.id = Some(id.to_string());
        }
        node
    }

    pub fn with_text(&mut self, node: NodeId, text: &str) -> NodeId {
        if let Some(el) = self.elements.get_mut(node.0) {
            el.text = text.to_string();
        }
        node
    }

    // --- Inspection ---

    pub fn classes(&self, node: NodeId) -> Vec<String> {
        self.elements
            .get(node.0)
            .map(|el| el.classes.clone())
            .unwrap_or_default()
    }

    pub fn display(&self, node: NodeId) -> Option<String> {
        self.elements.get(node.0).and_then(|el| el.display.clone())
    }

    /// Hidden means an inline `display: none`.
    pub fn is_hidden(&self, node: NodeId) -> bool {
        self.display(node).as_deref() == Some("none")
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        self.elements
            .get(node.0)
            .map(|el| el.inner_html.clone())
            .unwrap_or_default()
    }

    pub fn is_removed(&self, node: NodeId) -> bool {
        self.elements.get(node.0).map_or(true, |el| el.removed)
    }

    pub fn storage_item(&self, key: &str) -> Option<&str> {
        self.storage.get(key).map(String::as_str)
    }

    fn live(&self) -> impl Iterator<Item = (NodeId, &Element)> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, el)| !el.removed)
            .map(|(idx, el)| (NodeId(idx), el))
    }

    fn matches(el: &Element, selector: &Selector<'_>) -> bool {
        match selector {
            Selector::Class(class) => el.classes.iter().any(|c| c == class),
            Selector::Id(id) => el.id.as_deref() == Some(*id),
            Selector::HrefPrefix(prefix) => {
                el.tag == "a"
                    && el
                        .attributes
                        .get("href")
                        .is_some_and(|href| href.starts_with(prefix))
            }
        }
    }

    fn is_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.elements.get(node.0).and_then(|el| el.parent);
        while let Some(parent) = current {
            if parent == ancestor {
                return true;
            }
            current = self.elements.get(parent.0).and_then(|el| el.parent);
        }
        false
    }

    fn element_mut(&mut self, node: &NodeId) -> Option<&mut Element> {
        self.elements.get_mut(node.0).filter(|el| !el.removed)
    }
}

impl Clock for HeadlessBrowser {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

impl CookieJar for HeadlessBrowser {
    fn cookie_string(&self) -> String {
        self.cookies
            .iter()
            .filter(|(_, c)| c.expires.map_or(true, |exp| exp > self.now))
            .map(|(name, c)| format!("{}={}", name, c.value))
            .collect::<Vec<_>>()
            .join("; ")
    }

    fn write_cookie(&mut self, assignment: &str) {
        let mut parts = assignment.split(';');
        let Some((name, value)) = parts.next().and_then(|nv| nv.split_once('=')) else {
            tracing::warn!(assignment, "ignoring malformed cookie assignment");
            return;
        };
        let mut expires = None;
        for attr in parts {
            if let Some((key, val)) = attr.trim().split_once('=') {
                if key.eq_ignore_ascii_case("expires") {
                    expires = DateTime::parse_from_rfc2822(val.trim())
                        .ok()
                        .map(|d| d.with_timezone(&Utc));
                }
            }
        }
        let name = name.trim().to_string();
        if expires.is_some_and(|exp| exp <= self.now) {
            self.cookies.remove(&name);
            return;
        }
        self.cookies.insert(
            name,
            StoredCookie {
                value: value.to_string(),
                expires,
            },
        );
    }
}

impl KeyValueStorage for HeadlessBrowser {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) {
        self.storage.insert(key.to_string(), value.to_string());
    }

    fn remove_item(&mut self, key: &str) {
        self.storage.remove(key);
    }
}

impl Dialogs for HeadlessBrowser {
    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.confirms.push(message.to_string());
        self.confirm_answers.pop_front().unwrap_or(true)
    }
}

impl Location for HeadlessBrowser {
    fn pathname(&self) -> String {
        self.pathname.clone()
    }

    fn search(&self) -> String {
        self.search.clone()
    }

    fn assign(&mut self, url: &str) {
        self.navigations.push(url.to_string());
    }
}

impl ColorScheme for HeadlessBrowser {
    fn prefers_dark(&self) -> bool {
        self.prefers_dark
    }
}

impl Dom for HeadlessBrowser {
    type Node = NodeId;

    fn body(&self) -> Option<NodeId> {
        Some(NodeId(0))
    }

    fn query_all(&self, selector: &Selector<'_>) -> Vec<NodeId> {
        self.live()
            .filter(|(_, el)| Self::matches(el, selector))
            .map(|(id, _)| id)
            .collect()
    }

    fn query_within(&self, parent: &NodeId, selector: &Selector<'_>) -> Option<NodeId> {
        self.live()
            .filter(|(id, el)| Self::matches(el, selector) && self.is_descendant(*id, *parent))
            .map(|(id, _)| id)
            .next()
    }

    fn query_all_within(&self, parent: &NodeId, selector: &Selector<'_>) -> Vec<NodeId> {
        self.live()
            .filter(|(id, el)| Self::matches(el, selector) && self.is_descendant(*id, *parent))
            .map(|(id, _)| id)
            .collect()
    }

    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.query_all(&Selector::Id(id)).into_iter().next()
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.elements
            .get(node.0)
            .is_some_and(|el| el.classes.iter().any(|c| c == class))
    }

    fn add_class(&mut self, node: &NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            if !el.classes.iter().any(|c| c == class) {
                el.classes.push(class.to_string());
            }
        }
    }

    fn remove_class(&mut self, node: &NodeId, class: &str) {
        if let Some(el) = self.element_mut(node) {
            el.classes.retain(|c| c != class);
        }
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.elements
            .get(node.0)
            .and_then(|el| el.attributes.get(name).cloned())
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(node) {
            el.attributes.insert(name.to_string(), value.to_string());
        }
    }

    fn set_display(&mut self, node: &NodeId, display: Option<&str>) {
        if let Some(el) = self.element_mut(node) {
            el.display = display.map(str::to_string);
        }
    }

    fn text(&self, node: &NodeId) -> String {
        self.elements
            .get(node.0)
            .map(|el| el.text.clone())
            .unwrap_or_default()
    }

    fn set_text(&mut self, node: &NodeId, text: &str) {
        if let Some(el) = self.element_mut(node) {
            el.text = text.to_string();
        }
    }

    fn set_inner_html(&mut self, node: &NodeId, html: &str) {
        if let Some(el) = self.element_mut(node) {
            el.inner_html = html.to_string();
        }
    }

    fn append_button(&mut self, class: &str, aria_label: &str, inner_html: &str) -> Option<NodeId> {
        let node = self.element("button", &[class]);
        self.set_attribute(&node, "aria-label", aria_label);
        self.set_inner_html(&node, inner_html);
        Some(node)
    }

    fn remove(&mut self, node: &NodeId) {
        let doomed: Vec<usize> = (0..self.elements.len())
            .filter(|idx| NodeId(*idx) == *node || self.is_descendant(NodeId(*idx), *node))
            .collect();
        for idx in doomed {
            self.elements[idx].removed = true;
        }
    }
}
