/* src/router/wasm/src/convert.rs */

// JS <-> Rust value bridging. Page data crosses as JSON.

use js_sys::{Function, Object, Reflect};
use pagewright_router::{ClientFetch, ModuleRecord, PageModule, Params, PlatformError, Props, RouteProps};
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

pub(crate) fn js_error(value: &JsValue) -> PlatformError {
  if let Some(err) = value.dyn_ref::<js_sys::Error>() {
    return PlatformError::new(String::from(err.message()));
  }
  match value.as_string() {
    Some(message) => PlatformError::new(message),
    None => PlatformError::new(format!("{value:?}")),
  }
}

pub(crate) fn get(target: &JsValue, key: &str) -> JsValue {
  Reflect::get(target, &JsValue::from_str(key)).unwrap_or(JsValue::UNDEFINED)
}

fn defined(value: JsValue) -> Option<JsValue> {
  if value.is_undefined() || value.is_null() { None } else { Some(value) }
}

pub(crate) fn to_json(value: &JsValue) -> Result<Value, PlatformError> {
  if value.is_undefined() {
    return Ok(Value::Null);
  }
  let text = js_sys::JSON::stringify(value).map_err(|e| js_error(&e))?;
  Ok(serde_json::from_str(&String::from(text))?)
}

pub(crate) fn to_props(value: &JsValue) -> Result<Props, PlatformError> {
  match to_json(value)? {
    Value::Object(map) => Ok(map),
    Value::Null => Ok(Props::new()),
    other => Err(PlatformError::new(format!("expected an object, got {other}"))),
  }
}

pub(crate) fn from_json<T: serde::Serialize + ?Sized>(value: &T) -> JsValue {
  serde_json::to_string(value)
    .ok()
    .and_then(|text| js_sys::JSON::parse(&text).ok())
    .unwrap_or(JsValue::UNDEFINED)
}

pub(crate) fn set(target: &Object, key: &str, value: &JsValue) {
  let _ = Reflect::set(target, &JsValue::from_str(key), value);
}

fn client_fetch(hook: Function) -> ClientFetch {
  ClientFetch::new(move |params: Params| {
    let args = Object::new();
    set(&args, "params", &from_json(&params));
    let called = hook.call1(&JsValue::NULL, &args);
    Box::pin(async move {
      let value = called.map_err(|e| js_error(&e))?;
      let resolved = JsFuture::from(js_sys::Promise::resolve(&value)).await.map_err(|e| js_error(&e))?;
      to_props(&resolved)
    })
  })
}

/// Read a page module namespace by export presence.
pub(crate) fn page_module(ns: &JsValue) -> PageModule<JsValue> {
  PageModule {
    component: defined(get(ns, "default")),
    eager: get(ns, "eager").is_truthy(),
    prefetch: get(ns, "prefetch").is_function(),
    client_fetch: get(ns, "clientFetch").dyn_into::<Function>().ok().map(client_fetch),
  }
}

pub(crate) fn route_props(value: &JsValue) -> RouteProps<JsValue> {
  RouteProps {
    page_component: defined(get(value, "pageComponent")),
    layout_component: defined(get(value, "layoutComponent")),
    app_layout_component: defined(get(value, "appLayoutComponent")),
  }
}

pub(crate) fn route_props_object(props: &RouteProps<JsValue>, target: &Object) {
  let fields = [
    ("pageComponent", &props.page_component),
    ("layoutComponent", &props.layout_component),
    ("appLayoutComponent", &props.app_layout_component),
  ];
  for (key, component) in fields {
    set(target, key, component.as_ref().unwrap_or(&JsValue::UNDEFINED));
  }
}

/// A generated entry exports `page` and `routeProps()`; anything else is a
/// bare component module.
pub(crate) fn module_record(ns: &JsValue) -> Result<ModuleRecord<JsValue>, PlatformError> {
  let page = get(ns, "page");
  match get(ns, "routeProps").dyn_into::<Function>() {
    Ok(route_props_fn) if page.is_object() => {
      let props = route_props_fn.call0(&JsValue::NULL).map_err(|e| js_error(&e))?;
      Ok(ModuleRecord::Entry { page: page_module(&page), route_props: route_props(&props) })
    }
    _ => Ok(ModuleRecord::Component(page_module(ns))),
  }
}
