//! Browser bindings, compiled with the `hydrate` feature.
//!
//! SYSTEM CONTEXT
//! ==============
//! The widget core only sees the [`Document`], [`Storage`] and
//! [`Persistence`] traits. This module backs them with web-sys: live DOM
//! elements, `localStorage`, and `document.cookie`. Clicks reach the toggles
//! through one delegated `click` listener on the document that walks from the
//! event target up through every enclosing `[data-kt-toggle]` element,
//! innermost first, the way the event would bubble through per-element
//! listeners.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, info, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};

use crate::config::ToggleOptions;
use crate::consts::{ELEMENT_REF_ATTR, TOGGLE_SELECTOR};
use crate::dom::{Document, ElementId, validate_attribute_name, validate_class_token};
use crate::error::{DomError, SelectorError, StorageError};
use crate::host::ToggleHost;
use crate::intern::{InternTable, LiveNode};
use crate::persistence::{PersistOptions, Persistence};
use crate::storage::Storage;
use crate::theme::{SystemTheme, ThemeStore};
use crate::toggle::ClickEvent;

/// Host shared between the page and the delegated click listener.
pub type SharedHost = Rc<RefCell<ToggleHost<BrowserDocument, CookiePersistence>>>;

fn dom_error(value: &JsValue) -> DomError {
    DomError::Browser(format!("{value:?}"))
}

fn storage_error(value: &JsValue) -> StorageError {
    StorageError::Browser(format!("{value:?}"))
}

// =============================================================
// Document
// =============================================================

/// [`Document`] over the live page.
///
/// Elements are interned on first sight and stamped with their handle. The
/// root `<html>` element is always id 0. Selectors go to the browser engine
/// unchanged.
#[derive(Debug)]
pub struct BrowserDocument {
    document: web_sys::Document,
    elements: InternTable<web_sys::Element>,
}

impl BrowserDocument {
    /// Wrap `document`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Browser`] when the document has no root element.
    pub fn new(document: web_sys::Document) -> Result<Self, DomError> {
        let root = document
            .document_element()
            .ok_or_else(|| DomError::Browser("document has no root element".to_owned()))?;
        Ok(Self { document, elements: InternTable::new(root) })
    }

    /// Wrap `window.document`.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::Browser`] outside a browser window.
    pub fn current() -> Result<Self, DomError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| DomError::Browser("no window document".to_owned()))?;
        Self::new(document)
    }

    #[must_use]
    pub fn web_document(&self) -> &web_sys::Document {
        &self.document
    }

    /// Handle for `element`, interning it if it has not been seen yet.
    pub fn intern(&mut self, element: web_sys::Element) -> ElementId {
        ElementId::from_index(self.elements.intern(element))
    }

    /// The live element behind `id`.
    ///
    /// Elements dropped from the table while detached are found again by
    /// their stamp.
    ///
    /// # Errors
    ///
    /// Returns [`DomError::UnknownElement`] when no element carries the handle.
    pub fn element(&self, id: ElementId) -> Result<web_sys::Element, DomError> {
        if let Some(element) = self.elements.get(id.index()) {
            return Ok(element.clone());
        }
        let stamped = format!("[{ELEMENT_REF_ATTR}=\"{}\"]", id.index());
        match self.document.query_selector(&stamped) {
            Ok(Some(element)) => Ok(element),
            Ok(None) => Err(DomError::UnknownElement(id.index())),
            Err(e) => Err(dom_error(&e)),
        }
    }

    fn intern_list(&mut self, list: &web_sys::NodeList) -> Vec<ElementId> {
        let mut found = Vec::with_capacity(list.length() as usize);
        for i in 0..list.length() {
            if let Some(element) = list.item(i).and_then(|node| node.dyn_into::<web_sys::Element>().ok()) {
                found.push(self.intern(element));
            }
        }
        found
    }
}

impl LiveNode for web_sys::Element {
    fn same_node(&self, other: &Self) -> bool {
        let other: &web_sys::Node = other.as_ref();
        self.is_same_node(Some(other))
    }

    fn is_connected(&self) -> bool {
        let node: &web_sys::Node = self.as_ref();
        node.is_connected()
    }

    fn stamp(&self) -> Option<usize> {
        let raw = self.get_attribute(ELEMENT_REF_ATTR)?;
        match raw.parse() {
            Ok(handle) => Some(handle),
            Err(e) => {
                debug!(stamp = %raw, error = %e, "ignoring foreign element stamp");
                None
            }
        }
    }

    fn set_stamp(&self, handle: usize) {
        if let Err(e) = self.set_attribute(ELEMENT_REF_ATTR, &handle.to_string()) {
            warn!(handle, error = ?e, "element could not be stamped");
        }
    }
}

fn rejected(selector: &str) -> SelectorError {
    SelectorError::Malformed { selector: selector.to_owned(), reason: "rejected by the browser" }
}

impl Document for BrowserDocument {
    fn root(&self) -> ElementId {
        ElementId::from_index(0)
    }

    fn query_selector(&mut self, selector: &str) -> Result<Option<ElementId>, SelectorError> {
        let found = self.document.query_selector(selector).map_err(|_| rejected(selector))?;
        Ok(found.map(|element| self.intern(element)))
    }

    fn query_selector_all(&mut self, selector: &str) -> Result<Vec<ElementId>, SelectorError> {
        let list = self.document.query_selector_all(selector).map_err(|_| rejected(selector))?;
        Ok(self.intern_list(&list))
    }

    fn query_body_selector_all(&mut self, selector: &str) -> Result<Vec<ElementId>, SelectorError> {
        let Some(body) = self.document.body() else {
            return Ok(Vec::new());
        };
        let list = body.query_selector_all(selector).map_err(|_| rejected(selector))?;
        Ok(self.intern_list(&list))
    }

    fn get_attribute(&self, element: ElementId, name: &str) -> Option<String> {
        let Ok(live) = self.element(element) else {
            return None;
        };
        live.get_attribute(name)
    }

    fn set_attribute(&mut self, element: ElementId, name: &str, value: &str) -> Result<(), DomError> {
        validate_attribute_name(name)?;
        self.element(element)?.set_attribute(name, value).map_err(|e| dom_error(&e))
    }

    fn remove_attribute(&mut self, element: ElementId, name: &str) -> Result<(), DomError> {
        validate_attribute_name(name)?;
        self.element(element)?.remove_attribute(name).map_err(|e| dom_error(&e))
    }

    fn add_class(&mut self, element: ElementId, class: &str) -> Result<(), DomError> {
        validate_class_token(class)?;
        self.element(element)?.class_list().add_1(class).map_err(|e| dom_error(&e))
    }

    fn remove_class(&mut self, element: ElementId, class: &str) -> Result<(), DomError> {
        validate_class_token(class)?;
        self.element(element)?.class_list().remove_1(class).map_err(|e| dom_error(&e))
    }

    fn has_class(&self, element: ElementId, class: &str) -> bool {
        self.element(element).is_ok_and(|el| el.class_list().contains(class))
    }
}

// =============================================================
// localStorage
// =============================================================

#[derive(Debug, Clone)]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

impl LocalStorage {
    /// Open `window.localStorage`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] when storage is disabled or
    /// there is no window.
    pub fn current() -> Result<Self, StorageError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { storage })
    }
}

impl Storage for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage.get_item(key).map_err(|e| storage_error(&e))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage.set_item(key, value).map_err(|e| storage_error(&e))
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage.remove_item(key).map_err(|e| storage_error(&e))
    }
}

// =============================================================
// Cookies
// =============================================================

/// [`Persistence`] over `document.cookie`.
///
/// The path a flag was written with is remembered so `delete` expires the
/// same cookie.
#[derive(Debug, Clone)]
pub struct CookiePersistence {
    document: web_sys::HtmlDocument,
    paths: HashMap<String, String>,
}

impl CookiePersistence {
    /// Cookies of `window.document`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] outside an HTML document.
    pub fn current() -> Result<Self, StorageError> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.dyn_into::<web_sys::HtmlDocument>().ok())
            .ok_or(StorageError::Unavailable)?;
        Ok(Self { document, paths: HashMap::new() })
    }

    fn write(&self, cookie: &str) -> Result<(), StorageError> {
        self.document.set_cookie(cookie).map_err(|e| storage_error(&e))
    }
}

impl Persistence for CookiePersistence {
    fn get(&self, key: &str) -> Option<String> {
        let cookies = self.document.cookie().ok()?;
        cookies
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.to_owned())
    }

    fn set(&mut self, key: &str, value: &str, options: &PersistOptions) -> Result<(), StorageError> {
        let mut cookie = format!("{key}={value}");
        if let Some(path) = &options.path {
            cookie.push_str("; path=");
            cookie.push_str(path);
            self.paths.insert(key.to_owned(), path.clone());
        }
        if let Some(max_age) = options.max_age_secs {
            cookie.push_str(&format!("; max-age={max_age}"));
        }
        self.write(&cookie)
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        let mut cookie = format!("{key}=; max-age=0");
        if let Some(path) = self.paths.remove(key) {
            cookie.push_str("; path=");
            cookie.push_str(&path);
        }
        self.write(&cookie)
    }
}

// =============================================================
// System theme
// =============================================================

/// [`SystemTheme`] backed by the `prefers-color-scheme` media query.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaQuerySystemTheme;

impl SystemTheme for MediaQuerySystemTheme {
    fn prefers_dark(&self) -> bool {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-color-scheme: dark)").ok().flatten())
            .is_some_and(|mq| mq.matches())
    }
}

// =============================================================
// Mounting
// =============================================================

/// Install the delegated click listener for `host` on its document.
///
/// The listener holds a clone of `host` and lives as long as the page.
///
/// # Errors
///
/// Returns [`DomError::Browser`] when the listener cannot be added.
pub fn mount(host: &SharedHost) -> Result<(), DomError> {
    let document = host.borrow().document().web_document().clone();
    let shared = Rc::clone(host);
    let listener = Closure::wrap(Box::new(move |event: web_sys::Event| {
        dispatch(&shared, &event);
    }) as Box<dyn FnMut(web_sys::Event)>);
    document
        .add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())
        .map_err(|e| dom_error(&e))?;
    listener.forget();
    debug!("toggle click listener mounted");
    Ok(())
}

fn dispatch(host: &SharedHost, event: &web_sys::Event) {
    let mut current = event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
        .and_then(|el| el.closest(TOGGLE_SELECTOR).ok().flatten());
    if current.is_none() {
        return;
    }

    let Ok(mut host) = host.try_borrow_mut() else {
        warn!("toggle host is busy; click dropped");
        return;
    };
    while let Some(controller) = current {
        let parent = controller.parent_element();
        let element = host.document_mut().intern(controller);
        let mut click = ClickEvent::new();
        if host.click(element, &mut click).is_some() && click.default_prevented() {
            event.prevent_default();
        }
        current = parent.and_then(|p| p.closest(TOGGLE_SELECTOR).ok().flatten());
    }
}

/// Bootstrap every toggle on the page, restore the saved theme, and start
/// listening for clicks.
///
/// # Errors
///
/// Returns [`DomError::Browser`] outside a browser document or when the
/// click listener cannot be installed.
pub fn start(options: ToggleOptions) -> Result<SharedHost, DomError> {
    console_error_panic_hook::set_once();

    let mut document = BrowserDocument::current()?;
    match LocalStorage::current() {
        Ok(storage) => {
            ThemeStore::load(&storage).apply(&mut document, &MediaQuerySystemTheme);
        }
        Err(e) => warn!(error = %e, "theme not restored"),
    }

    let persistence = CookiePersistence::current().map_err(|e| DomError::Browser(e.to_string()))?;
    let host = Rc::new(RefCell::new(ToggleHost::with_options(document, persistence, options)));
    let created = host.borrow_mut().bootstrap();
    mount(&host)?;
    info!(created, "toggles hydrated");
    Ok(host)
}

/// JavaScript entry point: `initToggles('{"saveState": true}')`.
///
/// # Errors
///
/// Throws when the options are not valid JSON or the page cannot be hydrated.
#[wasm_bindgen(js_name = initToggles)]
pub fn init_toggles(options: Option<String>) -> Result<(), JsValue> {
    let options = match options.as_deref() {
        None | Some("") => ToggleOptions::default(),
        Some(raw) => serde_json::from_str(raw).map_err(|e| JsValue::from_str(&e.to_string()))?,
    };
    start(options)
        .map(|_host| ())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
