/* src/router/wasm/src/platform.rs */

use futures_util::future::LocalBoxFuture;
use js_sys::{Function, Promise};
use pagewright_router::{ModuleRecord, Platform, PlatformError, PreloadLink};
use serde_json::Value;
use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlAnchorElement, Response, Window};

use crate::convert::{js_error, module_record, to_json};

/// Browser capabilities backed by `web-sys`, plus the host's `import()` shim.
#[derive(Clone)]
pub(crate) struct WebPlatform {
  window: Window,
  import: Function,
  /// Location at start-up, used if the live one cannot be read.
  initial: Url,
}

impl WebPlatform {
  pub(crate) fn new(import: Function) -> Result<Self, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    let href = window.location().href()?;
    let initial = Url::parse(&href).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(Self { window, import, initial })
  }

  pub(crate) fn window(&self) -> &Window {
    &self.window
  }
}

fn fetch_failed(url: &str, err: &JsValue) -> PlatformError {
  PlatformError::new(format!("fetch {url}: {}", js_error(err)))
}

impl Platform for WebPlatform {
  type Component = JsValue;

  fn load_module(
    &self,
    url: &str,
  ) -> LocalBoxFuture<'static, Result<ModuleRecord<JsValue>, PlatformError>> {
    let imported = self.import.call1(&JsValue::NULL, &JsValue::from_str(url));
    Box::pin(async move {
      let promise = imported.map_err(|e| js_error(&e))?;
      let ns = JsFuture::from(Promise::resolve(&promise)).await.map_err(|e| js_error(&e))?;
      module_record(&ns)
    })
  }

  fn fetch_json(&self, url: &str) -> LocalBoxFuture<'static, Result<Value, PlatformError>> {
    let request = self.window.fetch_with_str(url);
    let url = url.to_string();
    Box::pin(async move {
      let response = JsFuture::from(request).await.map_err(|e| fetch_failed(&url, &e))?;
      let response: Response = response.dyn_into().map_err(|e| fetch_failed(&url, &e))?;
      if !response.ok() {
        return Err(PlatformError::new(format!("fetch {url}: HTTP {}", response.status())));
      }
      let body = response.json().map_err(|e| fetch_failed(&url, &e))?;
      let body = JsFuture::from(body).await.map_err(|e| fetch_failed(&url, &e))?;
      to_json(&body)
    })
  }

  fn delay(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
    let window = self.window.clone();
    let timeout = i32::try_from(ms).unwrap_or(i32::MAX);
    let promise = Promise::new(&mut |resolve, _reject| {
      let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, timeout);
    });
    Box::pin(async move {
      let _ = JsFuture::from(promise).await;
    })
  }

  fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
    wasm_bindgen_futures::spawn_local(task);
  }

  fn push_state(&self, href: &str, id: u64) {
    let Ok(history) = self.window.history() else {
      return;
    };
    let state = js_sys::Object::new();
    crate::convert::set(&state, "id", &JsValue::from_f64(id as f64));
    if let Err(err) = history.push_state_with_url(&state, "", Some(href)) {
      self.report_error(&js_error(&err));
    }
  }

  fn hard_navigate(&self, href: &str) {
    if let Err(err) = self.window.location().set_href(href) {
      self.report_error(&js_error(&err));
    }
  }

  fn location(&self) -> Url {
    self
      .window
      .location()
      .href()
      .ok()
      .and_then(|href| Url::parse(&href).ok())
      .unwrap_or_else(|| self.initial.clone())
  }

  fn links(&self) -> Vec<Url> {
    let Some(document) = self.window.document() else {
      return Vec::new();
    };
    let Ok(anchors) = document.query_selector_all("a[href]") else {
      return Vec::new();
    };
    (0..anchors.length())
      .filter_map(|i| anchors.item(i))
      .filter_map(|node| node.dyn_into::<HtmlAnchorElement>().ok())
      .filter_map(|anchor| Url::parse(&anchor.href()).ok())
      .collect()
  }

  fn insert_preload(&self, link: PreloadLink) {
    let Some(document) = self.window.document() else {
      return;
    };
    let (Ok(el), Some(head)) = (document.create_element("link"), document.head()) else {
      return;
    };
    let mut attrs = match &link {
      PreloadLink::Module(_) => vec![("rel", "modulepreload")],
      PreloadLink::Fetch(_) => vec![("rel", "preload"), ("as", "fetch")],
    };
    attrs.push(("href", link.href()));
    for (name, value) in attrs {
      let _ = el.set_attribute(name, value);
    }
    let _ = head.append_child(&el);
  }

  fn report_error(&self, error: &PlatformError) {
    web_sys::console::error_1(&JsValue::from_str(error.message()));
  }
}
