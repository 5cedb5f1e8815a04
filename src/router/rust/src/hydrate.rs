/* src/router/rust/src/hydrate.rs */

use crate::module::{PageModule, Props, RouteProps};
use crate::platform::Platform;
use crate::root::{Mount, RouteState};
use crate::router::{Mode, Router};

/// Arguments of a generated entry's `start({ pageProps, hydrate })`.
pub struct StartOptions<C> {
  pub page_id: String,
  pub page: PageModule<C>,
  pub route_props: RouteProps<C>,
  pub page_props: Props,
  /// Attach to server-rendered markup instead of rendering from scratch.
  pub hydrate: bool,
  pub mode: Mode,
}

/// Mount the Route root with `fetching: true` and hand it to a new router.
///
/// Generated page entries mount the Route root themselves and call
/// [`Router::start`] through the runtime. This is the path for hosts that
/// leave mounting to the router, supplying a [`Mount`] instead.
pub fn start<P, M>(platform: P, mount: &M, options: StartOptions<P::Component>) -> Router<P, M::Root>
where
  P: Platform,
  M: Mount<P::Component>,
  M::Root: 'static,
{
  let StartOptions { page_id, page, route_props, page_props, hydrate, mode } = options;
  let root = mount.mount(
    RouteState { components: route_props, page_id, fetching: true, page_props: page_props.clone() },
    hydrate,
  );
  let router = Router::new(platform, root, mode);
  router.start(page, page_props);
  router
}
