/* src/router/rust/src/root.rs */

use crate::module::{Props, RouteProps};

/// Partial prop update for the Route root. `None` fields are left untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePatch<C> {
  pub components: Option<RouteProps<C>>,
  pub pathname: Option<String>,
  pub page_id: Option<String>,
  pub fetching: Option<bool>,
  pub page_props: Option<Props>,
  pub client_fetch_error: Option<bool>,
}

impl<C> Default for RoutePatch<C> {
  fn default() -> Self {
    Self {
      components: None,
      pathname: None,
      page_id: None,
      fetching: None,
      page_props: None,
      client_fetch_error: None,
    }
  }
}

/// Full prop set the Route root is mounted with.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteState<C> {
  pub components: RouteProps<C>,
  pub page_id: String,
  pub fetching: bool,
  pub page_props: Props,
}

/// A mounted Route root. Each `update` is applied atomically.
pub trait RootHandle<C> {
  fn update(&self, patch: RoutePatch<C>);
}

/// Constructs the Route root once per page load.
pub trait Mount<C> {
  type Root: RootHandle<C>;

  fn mount(&self, initial: RouteState<C>, hydrate: bool) -> Self::Root;
}

impl<C, T: RootHandle<C>> RootHandle<C> for std::rc::Rc<T> {
  fn update(&self, patch: RoutePatch<C>) {
    (**self).update(patch);
  }
}
