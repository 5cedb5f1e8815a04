/* src/router/rust/src/module.rs */

use std::fmt;
use std::rc::Rc;

use futures_util::future::LocalBoxFuture;
use serde_json::Value;

use crate::errors::PlatformError;
use crate::path::Params;

/// Plain key-value page data.
pub type Props = serde_json::Map<String, Value>;

type ClientFetchFn = dyn Fn(Params) -> LocalBoxFuture<'static, Result<Props, PlatformError>>;

/// A page's browser-only data hook.
#[derive(Clone)]
pub struct ClientFetch(Rc<ClientFetchFn>);

impl ClientFetch {
  pub fn new<F>(f: F) -> Self
  where
    F: Fn(Params) -> LocalBoxFuture<'static, Result<Props, PlatformError>> + 'static,
  {
    Self(Rc::new(f))
  }

  pub fn call(&self, params: Params) -> LocalBoxFuture<'static, Result<Props, PlatformError>> {
    (self.0)(params)
  }
}

impl fmt::Debug for ClientFetch {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("ClientFetch(..)")
  }
}

/// Loaded page module. Capabilities are checked by presence, not by type.
#[derive(Debug, Clone)]
pub struct PageModule<C> {
  /// The `default` export.
  pub component: Option<C>,
  pub eager: bool,
  /// True when the module exports a server-side `prefetch` hook.
  pub prefetch: bool,
  pub client_fetch: Option<ClientFetch>,
}

impl<C> PageModule<C> {
  pub fn new(component: C) -> Self {
    Self { component: Some(component), eager: false, prefetch: false, client_fetch: None }
  }
}

/// Component set handed to the Route root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteProps<C> {
  pub page_component: Option<C>,
  pub layout_component: Option<C>,
  pub app_layout_component: Option<C>,
}

impl<C> Default for RouteProps<C> {
  fn default() -> Self {
    Self { page_component: None, layout_component: None, app_layout_component: None }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
  AppLayout,
  Layout,
  Page,
}

impl Layer {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::AppLayout => "appLayout",
      Self::Layout => "layout",
      Self::Page => "page",
    }
  }
}

impl<C> RouteProps<C> {
  /// Nesting order, outermost first. Absent layers are skipped rather than
  /// replaced by an empty wrapper.
  pub fn layers(&self) -> Vec<Layer> {
    [
      (Layer::AppLayout, self.app_layout_component.is_some()),
      (Layer::Layout, self.layout_component.is_some()),
      (Layer::Page, self.page_component.is_some()),
    ]
    .into_iter()
    .filter_map(|(layer, present)| present.then_some(layer))
    .collect()
  }
}

/// What `load_module` resolves to.
#[derive(Debug, Clone)]
pub enum ModuleRecord<C> {
  /// A generated entry module exporting `page` and `routeProps()`.
  Entry { page: PageModule<C>, route_props: RouteProps<C> },
  /// A bare component module (dev loads of pages and layouts).
  Component(PageModule<C>),
}

impl<C> ModuleRecord<C> {
  pub fn into_page(self) -> PageModule<C> {
    match self {
      Self::Entry { page, .. } | Self::Component(page) => page,
    }
  }
}

/// Shallow merge with `overlay` winning on key collision.
pub fn merge_props(base: Option<&Props>, overlay: Props) -> Props {
  let mut merged = base.cloned().unwrap_or_default();
  merged.extend(overlay);
  merged
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn props(value: Value) -> Props {
    match value {
      Value::Object(map) => map,
      _ => unreachable!(),
    }
  }

  #[test]
  fn layers_skip_absent() {
    let only_page = RouteProps { page_component: Some("P"), ..Default::default() };
    assert_eq!(only_page.layers(), vec![Layer::Page]);

    let full = RouteProps {
      page_component: Some("P"),
      layout_component: Some("L"),
      app_layout_component: Some("A"),
    };
    assert_eq!(full.layers(), vec![Layer::AppLayout, Layer::Layout, Layer::Page]);

    let app_only = RouteProps {
      page_component: Some("P"),
      layout_component: None,
      app_layout_component: Some("A"),
    };
    assert_eq!(app_only.layers(), vec![Layer::AppLayout, Layer::Page]);
  }

  #[test]
  fn client_values_win() {
    let server = props(json!({"count": 1, "title": "home"}));
    let client = props(json!({"count": 2, "user": "ada"}));
    let merged = merge_props(Some(&server), client);
    assert_eq!(Value::Object(merged), json!({"count": 2, "title": "home", "user": "ada"}));
  }

  #[test]
  fn merge_without_base() {
    let merged = merge_props(None, props(json!({"a": 1})));
    assert_eq!(Value::Object(merged), json!({"a": 1}));
  }
}
