//! The real page, through web-sys.
//!
//! [`start`] is the wasm entry point: it builds the [`App`] for the current
//! document, runs the page load and attaches every event listener.

use super::{Clock, ColorScheme, CookieJar, Dialogs, Dom, KeyPress, KeyValueStorage, Location, Selector};
use crate::app::{App, CapabilityRequest};
use crate::config::ClientConfig;
use crate::handlers::admin::{dismissible_alerts, DELETE_BUTTON};
use crate::handlers::ClickOutcome;
use crate::logging::page_layer;
use crate::services::{AuthApi, CapabilityResolver, HttpAuthApi};
use chrono::{DateTime, TimeZone, Utc};
use std::cell::RefCell;
use std::rc::Rc;
use tracing_subscriber::layer::SubscriberExt;
use tracing_web::MakeWebConsoleWriter;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlDocument, HtmlElement, HtmlInputElement,
    KeyboardEvent, MediaQueryListEvent, NodeList, Storage, Window,
};

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";
const LOGIN_FORM_ID: &str = "loginForm";
const REGISTER_FORM_ID: &str = "registerForm";
const EMAIL_INPUT_ID: &str = "email";
const PASSWORD_INPUT_ID: &str = "password";

pub struct WebBrowser {
    window: Window,
    document: Document,
    storage: Option<Storage>,
}

impl WebBrowser {
    /// `None` outside a window context (e.g. in a worker).
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let storage = window.local_storage().ok().flatten();
        Some(Self {
            window,
            document,
            storage,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn input_value(&self, id: &str) -> String {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
            .unwrap_or_default()
    }

    fn html_document(&self) -> Option<HtmlDocument> {
        self.document.clone().dyn_into::<HtmlDocument>().ok()
    }
}

impl Clock for WebBrowser {
    fn now(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(js_sys::Date::now() as i64)
            .single()
            .unwrap_or_default()
    }
}

impl CookieJar for WebBrowser {
    fn cookie_string(&self) -> String {
        self.html_document()
            .and_then(|doc| doc.cookie().ok())
            .unwrap_or_default()
    }

    fn write_cookie(&mut self, assignment: &str) {
        if let Some(doc) = self.html_document() {
            if let Err(e) = doc.set_cookie(assignment) {
                tracing::warn!(error = ?e, "cookie write refused");
            }
        }
    }
}

impl KeyValueStorage for WebBrowser {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage
            .as_ref()
            .and_then(|s| s.get_item(key).ok().flatten())
    }

    fn set_item(&mut self, key: &str, value: &str) {
        if let Some(storage) = &self.storage {
            if let Err(e) = storage.set_item(key, value) {
                tracing::warn!(key, error = ?e, "local storage write refused");
            }
        }
    }

    fn remove_item(&mut self, key: &str) {
        if let Some(storage) = &self.storage {
            let _ = storage.remove_item(key);
        }
    }
}

impl Dialogs for WebBrowser {
    fn alert(&mut self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }

    fn confirm(&mut self, message: &str) -> bool {
        self.window.confirm_with_message(message).unwrap_or(false)
    }
}

impl Location for WebBrowser {
    fn pathname(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn search(&self) -> String {
        self.window.location().search().unwrap_or_default()
    }

    fn assign(&mut self, url: &str) {
        if let Err(e) = self.window.location().set_href(url) {
            tracing::warn!(url, error = ?e, "navigation refused");
        }
    }
}

impl ColorScheme for WebBrowser {
    fn prefers_dark(&self) -> bool {
        self.window
            .match_media(DARK_QUERY)
            .ok()
            .flatten()
            .is_some_and(|mql| mql.matches())
    }
}

impl Dom for WebBrowser {
    type Node = Element;

    fn body(&self) -> Option<Element> {
        self.document.body().map(Element::from)
    }

    fn query_all(&self, selector: &Selector<'_>) -> Vec<Element> {
        elements(self.document.query_selector_all(&selector.to_css()))
    }

    fn query_within(&self, parent: &Element, selector: &Selector<'_>) -> Option<Element> {
        parent.query_selector(&selector.to_css()).ok().flatten()
    }

    fn query_all_within(&self, parent: &Element, selector: &Selector<'_>) -> Vec<Element> {
        elements(parent.query_selector_all(&selector.to_css()))
    }

    fn by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn set_display(&mut self, node: &Element, display: Option<&str>) {
        let Some(el) = node.dyn_ref::<HtmlElement>() else {
            return;
        };
        let style = el.style();
        let _ = match display {
            Some(value) => style.set_property("display", value),
            None => style.remove_property("display").map(|_| ()),
        };
    }

    fn text(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text(&mut self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_inner_html(&mut self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn append_button(&mut self, class: &str, aria_label: &str, inner_html: &str) -> Option<Element> {
        let button = self.document.create_element("button").ok()?;
        button.set_class_name(class);
        button.set_attribute("aria-label", aria_label).ok()?;
        button.set_inner_html(inner_html);
        self.document.body()?.append_child(&button).ok()?;
        Some(button)
    }

    fn remove(&mut self, node: &Element) {
        node.remove();
    }
}

fn elements(list: Result<NodeList, JsValue>) -> Vec<Element> {
    let Ok(list) = list else {
        return Vec::new();
    };
    (0..list.length())
        .filter_map(|idx| list.get(idx))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

type PageApp = Rc<RefCell<App<WebBrowser, HttpAuthApi>>>;

fn listen<T>(target: &T, event: &str, handler: impl FnMut(Event) + 'static)
where
    T: AsRef<EventTarget>,
{
    let closure = Closure::<dyn FnMut(Event)>::new(handler);
    if let Err(e) = target
        .as_ref()
        .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
    {
        tracing::warn!(event, error = ?e, "listener not attached");
    }
    // lives as long as the page
    closure.forget();
}

/// Wasm entry point, called once the document has loaded.
#[wasm_bindgen]
pub fn start() -> Result<(), JsValue> {
    init_logging();
    let browser = WebBrowser::new().ok_or_else(|| JsValue::from_str("no window or document"))?;
    let config = ClientConfig {
        base_url: browser.window.location().origin()?,
        ..ClientConfig::default()
    };
    let api = HttpAuthApi::new(&config);
    let app: PageApp = Rc::new(RefCell::new(App::new(browser, api, config)));

    let request = app.borrow_mut().begin_load();
    if let Some(request) = request {
        spawn_capability_check(&app, request);
    }

    wire_protected_links(&app);
    wire_logout(&app);
    wire_forms(&app);
    wire_theme(&app);
    wire_admin(&app);
    Ok(())
}

/// Routes `tracing` events to the browser console.
fn init_logging() {
    let subscriber = tracing_subscriber::registry().with(page_layer(MakeWebConsoleWriter::new()));
    // the host page may have installed one already
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// The check runs in the background; the page stays usable meanwhile.
fn spawn_capability_check(app: &PageApp, request: CapabilityRequest) {
    let api = app.borrow().api.clone();
    let app = Rc::clone(app);
    wasm_bindgen_futures::spawn_local(async move {
        let is_admin = CapabilityResolver::check_admin_capability(&api, &request.token).await;
        app.borrow_mut().settle_capability(&request, is_admin);
    });
}

fn wire_protected_links(app: &PageApp) {
    let links = {
        let page = app.borrow();
        page.browser
            .query_all(&Selector::HrefPrefix(&page.config.protected_prefix))
    };
    for link in links {
        let href = link.get_attribute("href").unwrap_or_default();
        let app = Rc::clone(app);
        listen(&link, "click", move |event| {
            let outcome = app.borrow_mut().protected_link_click(&href);
            if outcome.suppresses_default() {
                event.prevent_default();
            }
        });
    }
}

fn wire_logout(app: &PageApp) {
    let link = {
        let page = app.borrow();
        page.browser.by_id(&page.config.logout_link_id)
    };
    if let Some(link) = link {
        let app = Rc::clone(app);
        listen(&link, "click", move |event| {
            event.prevent_default();
            app.borrow_mut().logout_click();
        });
    }
}

fn wire_forms(app: &PageApp) {
    let (login_form, register_form) = {
        let page = app.borrow();
        (page.browser.by_id(LOGIN_FORM_ID), page.browser.by_id(REGISTER_FORM_ID))
    };

    if let Some(form) = login_form {
        let app = Rc::clone(app);
        listen(&form, "submit", move |event| {
            event.prevent_default();
            let (api, username, password) = {
                let page = app.borrow();
                (
                    page.api.clone(),
                    page.browser.input_value(EMAIL_INPUT_ID),
                    page.browser.input_value(PASSWORD_INPUT_ID),
                )
            };
            let app = Rc::clone(&app);
            wasm_bindgen_futures::spawn_local(async move {
                let result = api.login(&username, &password).await;
                app.borrow_mut().finish_login(result);
            });
        });
    }

    if let Some(form) = register_form {
        let app = Rc::clone(app);
        listen(&form, "submit", move |event| {
            event.prevent_default();
            let (api, email, password) = {
                let page = app.borrow();
                (
                    page.api.clone(),
                    page.browser.input_value(EMAIL_INPUT_ID),
                    page.browser.input_value(PASSWORD_INPUT_ID),
                )
            };
            let app = Rc::clone(&app);
            wasm_bindgen_futures::spawn_local(async move {
                let result = api.register(&email, &password).await;
                app.borrow_mut().finish_register(result);
            });
        });
    }
}

fn wire_theme(app: &PageApp) {
    let (toggle, document, media) = {
        let page = app.borrow();
        (
            page.theme_toggle.clone(),
            page.browser.document().clone(),
            page.browser.window().match_media(DARK_QUERY).ok().flatten(),
        )
    };

    if let Some(toggle) = toggle {
        let app = Rc::clone(app);
        listen(&toggle, "click", move |_| {
            app.borrow_mut().toggle_theme();
        });
    }

    {
        let app = Rc::clone(app);
        listen(&document, "keydown", move |event| {
            let Some(ev) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            let key = KeyPress {
                key: ev.key(),
                ctrl: ev.ctrl_key(),
                meta: ev.meta_key(),
            };
            if app.borrow_mut().key_down(&key) {
                event.prevent_default();
            }
        });
    }

    if let Some(media) = media {
        let app = Rc::clone(app);
        listen(&media, "change", move |event| {
            if let Some(ev) = event.dyn_ref::<MediaQueryListEvent>() {
                app.borrow_mut().color_scheme_changed(ev.matches());
            }
        });
    }
}

fn wire_admin(app: &PageApp) {
    let (alerts, delete_buttons) = {
        let page = app.borrow();
        (
            dismissible_alerts(&page.browser),
            page.browser.query_all(&Selector::Class(DELETE_BUTTON)),
        )
    };

    for (alert, close) in alerts {
        let app = Rc::clone(app);
        listen(&close, "click", move |_| {
            let delay = app.borrow_mut().begin_alert_dismiss(&alert);
            let window = app.borrow().browser.window().clone();
            let later = Rc::clone(&app);
            let target = alert.clone();
            let callback = Closure::once_into_js(move || {
                later.borrow_mut().finish_alert_dismiss(&target);
            });
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay.as_millis() as i32,
            );
        });
    }

    for button in delete_buttons {
        let app = Rc::clone(app);
        listen(&button, "click", move |event| {
            if app.borrow_mut().delete_click() == ClickOutcome::Cancel {
                event.prevent_default();
            }
        });
    }
}
