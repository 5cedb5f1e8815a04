/* src/router/wasm/src/root.rs */

use js_sys::{Function, Object};
use pagewright_router::{Mount, RootHandle, RoutePatch, RouteState};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::convert::{from_json, get, js_error, route_props_object, set};

/// A Route root constructed by the host framework, patched through `$set`.
pub(crate) struct JsRoot {
  root: JsValue,
}

impl JsRoot {
  pub(crate) fn new(root: JsValue) -> Self {
    Self { root }
  }
}

impl RootHandle<JsValue> for JsRoot {
  fn update(&self, patch: RoutePatch<JsValue>) {
    let props = Object::new();
    if let Some(components) = &patch.components {
      route_props_object(components, &props);
    }
    if let Some(pathname) = &patch.pathname {
      set(&props, "pathname", &JsValue::from_str(pathname));
    }
    if let Some(page_id) = &patch.page_id {
      set(&props, "pageId", &JsValue::from_str(page_id));
    }
    if let Some(fetching) = patch.fetching {
      set(&props, "fetching", &JsValue::from_bool(fetching));
    }
    if let Some(page_props) = &patch.page_props {
      set(&props, "pageProps", &from_json(page_props));
    }
    if let Some(failed) = patch.client_fetch_error {
      set(&props, "clientFetchError", &JsValue::from_bool(failed));
    }

    let Ok(update) = get(&self.root, "$set").dyn_into::<Function>() else {
      return;
    };
    if let Err(err) = update.call1(&self.root, &props) {
      web_sys::console::error_1(&JsValue::from_str(js_error(&err).message()));
    }
  }
}

/// Host-supplied `mount(props, hydrate) -> root`.
pub(crate) struct JsMount {
  mount: Function,
}

impl JsMount {
  pub(crate) fn new(mount: Function) -> Self {
    Self { mount }
  }
}

impl Mount<JsValue> for JsMount {
  type Root = JsRoot;

  fn mount(&self, initial: RouteState<JsValue>, hydrate: bool) -> JsRoot {
    let props = Object::new();
    route_props_object(&initial.components, &props);
    set(&props, "pageId", &JsValue::from_str(&initial.page_id));
    set(&props, "fetching", &JsValue::from_bool(initial.fetching));
    set(&props, "pageProps", &from_json(&initial.page_props));
    let root = match self.mount.call2(&JsValue::NULL, &props, &JsValue::from_bool(hydrate)) {
      Ok(root) => root,
      Err(err) => {
        web_sys::console::error_1(&JsValue::from_str(js_error(&err).message()));
        JsValue::UNDEFINED
      }
    };
    JsRoot::new(root)
  }
}
