/* src/router/rust/src/router.rs */

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;

use futures_util::future::{self, LocalBoxFuture};
use serde_json::Value;
use url::Url;

use crate::errors::PlatformError;
use crate::manifest::{DEV_PREFETCH_PREFIX, MANIFEST_URL, Manifest, ManifestEntry};
use crate::module::{ClientFetch, ModuleRecord, PageModule, Props, RouteProps, merge_props};
use crate::path::{Params, normalize_pathname, parse_params};
use crate::platform::{Platform, PreloadLink};
use crate::root::{RootHandle, RoutePatch};

/// Idle time before anchors on the page are scanned for preloading.
pub const PRELOAD_IDLE_MS: u32 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Manifest refetched on every navigation, pages loaded from source modules.
  Dev,
  /// Manifest fetched once, pages loaded from bundled entries.
  Production,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
  Committed,
  /// A newer navigation started before this one finished; nothing was written.
  Superseded,
  /// No manifest entry for the pathname.
  Unmatched,
  Failed(PlatformError),
}

struct Loaded<C> {
  page: PageModule<C>,
  components: RouteProps<C>,
  data: Option<Props>,
}

struct Inner<P: Platform, R> {
  platform: P,
  root: R,
  mode: Mode,
  pending_ctr: Cell<u64>,
  last_pending_id: Cell<u64>,
  manifest: RefCell<Option<Rc<Manifest>>>,
  preloaded: RefCell<HashSet<String>>,
}

/// Client router bound to one mounted Route root.
///
/// Every navigation takes a fresh id from a monotonic counter and records it
/// as the latest. Each suspension point is followed by a check against that
/// latest id, and a navigation that lost the race returns without touching
/// the root. The hydrated page itself runs under id 0.
pub struct Router<P: Platform, R> {
  inner: Rc<Inner<P, R>>,
}

impl<P: Platform, R> Clone for Router<P, R> {
  fn clone(&self) -> Self {
    Self { inner: Rc::clone(&self.inner) }
  }
}

impl<P, R> Router<P, R>
where
  P: Platform,
  R: RootHandle<P::Component> + 'static,
{
  pub fn new(platform: P, root: R, mode: Mode) -> Self {
    Self {
      inner: Rc::new(Inner {
        platform,
        root,
        mode,
        pending_ctr: Cell::new(0),
        last_pending_id: Cell::new(0),
        manifest: RefCell::new(None),
        preloaded: RefCell::new(HashSet::new()),
      }),
    }
  }

  pub fn mode(&self) -> Mode {
    self.inner.mode
  }

  pub fn platform(&self) -> &P {
    &self.inner.platform
  }

  /// Id of the navigation currently allowed to commit.
  pub fn current_id(&self) -> u64 {
    self.inner.last_pending_id.get()
  }

  fn is_current(&self, id: u64) -> bool {
    self.inner.last_pending_id.get() == id
  }

  /// Post-hydration start-up: warm the manifest, schedule the idle preload in
  /// production, and run the hydrated page's `clientFetch` if it has one.
  pub fn start(&self, page: PageModule<P::Component>, page_props: Props) {
    let router = self.clone();
    let preload = self.inner.mode == Mode::Production;
    self.spawn(async move {
      if let Err(err) = router.manifest().await {
        router.inner.platform.report_error(&err);
        return;
      }
      if preload {
        router.inner.platform.delay(PRELOAD_IDLE_MS).await;
        router.preload().await;
      }
    });

    if let Some(client_fetch) = page.client_fetch {
      let id = self.current_id();
      self.inner.root.update(RoutePatch { fetching: Some(true), ..Default::default() });
      let router = self.clone();
      self.spawn(async move { router.bootstrap(id, client_fetch, page_props).await });
    }
  }

  async fn bootstrap(&self, id: u64, client_fetch: ClientFetch, page_props: Props) {
    let location = self.inner.platform.location();
    let params = parse_params(location.query().unwrap_or(""));
    let result = client_fetch.call(params).await;
    if !self.is_current(id) {
      return;
    }
    let patch = match result {
      Ok(client_props) => RoutePatch {
        fetching: Some(false),
        page_props: Some(merge_props(Some(&page_props), client_props)),
        client_fetch_error: Some(false),
        ..Default::default()
      },
      Err(err) => {
        self.inner.platform.report_error(&err);
        RoutePatch {
          fetching: Some(false),
          page_props: Some(page_props),
          client_fetch_error: Some(true),
          ..Default::default()
        }
      }
    };
    self.inner.root.update(patch);
  }

  /// Navigate to `url`, pushing it onto history first when `push` is set.
  pub async fn navigate(&self, url: &Url, push: bool) -> Navigation {
    let pathname = normalize_pathname(url.path());
    let params = parse_params(url.query().unwrap_or(""));

    let id = self.inner.pending_ctr.get() + 1;
    self.inner.pending_ctr.set(id);
    self.inner.last_pending_id.set(id);

    if push {
      self.inner.platform.push_state(url.as_str(), id);
    }

    let manifest = match self.manifest().await {
      Ok(manifest) => manifest,
      Err(err) => return self.fail(id, err),
    };
    if !self.is_current(id) {
      return Navigation::Superseded;
    }
    let Some(entry) = manifest.entry(&pathname).cloned() else {
      return Navigation::Unmatched;
    };

    let loaded = match self.inner.mode {
      Mode::Dev => self.load_dev(&manifest, &entry, &pathname).await,
      Mode::Production => self.load_entry(&entry).await,
    };
    let loaded = match loaded {
      Ok(loaded) => loaded,
      Err(err) => return self.fail(id, err),
    };
    if !self.is_current(id) {
      return Navigation::Superseded;
    }

    let outcome = self.commit(id, &entry.page_id, &pathname, loaded, params).await;
    if outcome == Navigation::Committed && self.inner.mode == Mode::Production {
      self.schedule_preload();
    }
    outcome
  }

  /// Handle an intercepted link click.
  ///
  /// The click's default action is already cancelled, so a navigation that
  /// finds no entry in the fresh manifest or fails to load hands the URL back
  /// to the browser as a full page load.
  pub async fn follow(&self, url: &Url) -> Navigation {
    let outcome = self.navigate(url, true).await;
    if matches!(outcome, Navigation::Unmatched | Navigation::Failed(_)) {
      self.inner.platform.hard_navigate(url.as_str());
    }
    outcome
  }

  fn fail(&self, id: u64, err: PlatformError) -> Navigation {
    if !self.is_current(id) {
      return Navigation::Superseded;
    }
    self.inner.platform.report_error(&err);
    Navigation::Failed(err)
  }

  async fn load_entry(&self, entry: &ManifestEntry) -> Result<Loaded<P::Component>, PlatformError> {
    let module = self.inner.platform.load_module(&entry.js);
    let data = optional(entry.data.as_deref().map(|url| self.inner.platform.fetch_json(url)));
    let (module, data) = future::join(module, data).await;

    let (page, components) = match module? {
      ModuleRecord::Entry { page, route_props } => (page, route_props),
      ModuleRecord::Component(page) => {
        let components = RouteProps { page_component: page.component.clone(), ..Default::default() };
        (page, components)
      }
    };
    let data = data.transpose()?.map(into_props).transpose()?;
    Ok(Loaded { page, components, data })
  }

  async fn load_dev(
    &self,
    manifest: &Manifest,
    entry: &ManifestEntry,
    pathname: &str,
  ) -> Result<Loaded<P::Component>, PlatformError> {
    let platform = &self.inner.platform;
    let page = platform.load_module(&entry.js);
    let layout = optional(entry.dev_layout_js.as_deref().map(|url| platform.load_module(url)));
    let app_layout =
      optional(manifest.dev_app_layout_url.as_deref().map(|url| platform.load_module(url)));
    let (page, layout, app_layout) = future::join3(page, layout, app_layout).await;

    let page = page?.into_page();
    // layout modules are optional; a failed import leaves the layer out
    let layout = layout.and_then(Result::ok).map(ModuleRecord::into_page);
    let app_layout = app_layout.and_then(Result::ok).map(ModuleRecord::into_page);

    let data = if page.prefetch {
      let value = platform.fetch_json(&format!("{DEV_PREFETCH_PREFIX}{pathname}")).await?;
      Some(into_props(value)?)
    } else {
      None
    };

    let components = RouteProps {
      page_component: page.component.clone(),
      layout_component: layout.and_then(|m| m.component),
      app_layout_component: app_layout.and_then(|m| m.component),
    };
    Ok(Loaded { page, components, data })
  }

  async fn commit(
    &self,
    id: u64,
    page_id: &str,
    pathname: &str,
    loaded: Loaded<P::Component>,
    params: Params,
  ) -> Navigation {
    let Loaded { page, components, data } = loaded;
    let root = &self.inner.root;
    let mut components = Some(components);

    if page.eager {
      root.update(RoutePatch {
        components: components.take(),
        pathname: Some(pathname.to_string()),
        page_id: Some(page_id.to_string()),
        fetching: Some(true),
        page_props: Some(data.clone().unwrap_or_default()),
        client_fetch_error: Some(false),
      });
    }

    let client_props = match &page.client_fetch {
      Some(client_fetch) => client_fetch.call(params).await,
      None => Ok(Props::new()),
    };
    if !self.is_current(id) {
      return Navigation::Superseded;
    }

    let (page_props, failed) = match client_props {
      Ok(client_props) => (merge_props(data.as_ref(), client_props), false),
      Err(err) => {
        self.inner.platform.report_error(&err);
        (data.unwrap_or_default(), true)
      }
    };
    root.update(RoutePatch {
      components,
      pathname: Some(pathname.to_string()),
      page_id: Some(page_id.to_string()),
      fetching: Some(false),
      page_props: Some(page_props),
      client_fetch_error: Some(failed),
    });
    Navigation::Committed
  }

  /// The route manifest: refetched every call in dev, fetched once in production.
  pub async fn manifest(&self) -> Result<Rc<Manifest>, PlatformError> {
    if self.inner.mode == Mode::Production {
      let cached = self.inner.manifest.borrow().clone();
      if let Some(manifest) = cached {
        return Ok(manifest);
      }
    }
    let value = self.inner.platform.fetch_json(MANIFEST_URL).await?;
    let manifest = Rc::new(serde_json::from_value::<Manifest>(value)?);
    *self.inner.manifest.borrow_mut() = Some(Rc::clone(&manifest));
    Ok(manifest)
  }

  /// Whether a click on `url` should be handled here instead of by the browser.
  ///
  /// Only same-origin links to another page that the last seen manifest knows
  /// about are intercepted.
  pub fn intercepts(&self, url: &Url) -> bool {
    let location = self.inner.platform.location();
    if url.origin() != location.origin() {
      return false;
    }
    if normalize_pathname(url.path()) == normalize_pathname(location.path()) {
      return false;
    }
    self.inner.manifest.borrow().as_ref().is_some_and(|m| m.entry(url.path()).is_some())
  }

  /// Insert preload links for every known same-origin anchor target not seen before.
  pub async fn preload(&self) {
    let manifest = match self.manifest().await {
      Ok(manifest) => manifest,
      Err(err) => {
        self.inner.platform.report_error(&err);
        return;
      }
    };
    let platform = &self.inner.platform;
    let location = platform.location();
    let current = normalize_pathname(location.path());

    for link in platform.links() {
      if link.origin() != location.origin() {
        continue;
      }
      let pathname = normalize_pathname(link.path());
      if pathname == current {
        continue;
      }
      let Some(entry) = manifest.entry(&pathname) else {
        continue;
      };
      if !self.inner.preloaded.borrow_mut().insert(pathname) {
        continue;
      }
      platform.insert_preload(PreloadLink::Module(entry.js.clone()));
      for chunk in &entry.preload_js {
        platform.insert_preload(PreloadLink::Module(chunk.clone()));
      }
      if let Some(data) = &entry.data {
        platform.insert_preload(PreloadLink::Fetch(data.clone()));
      }
    }
  }

  fn schedule_preload(&self) {
    let router = self.clone();
    let idle = self.inner.platform.delay(PRELOAD_IDLE_MS);
    self.spawn(async move {
      idle.await;
      router.preload().await;
    });
  }

  fn spawn(&self, task: impl Future<Output = ()> + 'static) {
    self.inner.platform.spawn_local(Box::pin(task));
  }
}

async fn optional<T>(
  fut: Option<LocalBoxFuture<'static, Result<T, PlatformError>>>,
) -> Option<Result<T, PlatformError>> {
  match fut {
    Some(fut) => Some(fut.await),
    None => None,
  }
}

fn into_props(value: Value) -> Result<Props, PlatformError> {
  match value {
    Value::Object(map) => Ok(map),
    Value::Null => Ok(Props::new()),
    other => Err(PlatformError::new(format!("expected page data to be an object, got {other}"))),
  }
}
