/* src/router/rust/src/tests.rs */

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::task::LocalSpawnExt;
use futures_util::future::{self, LocalBoxFuture};
use serde_json::{Value, json};
use url::Url;

use crate::errors::PlatformError;
use crate::hydrate::{self, StartOptions};
use crate::manifest::{MANIFEST_URL, Manifest, ManifestEntry};
use crate::module::{ClientFetch, ModuleRecord, PageModule, Props, RouteProps};
use crate::path::Params;
use crate::platform::{Platform, PreloadLink};
use crate::root::{Mount, RootHandle, RoutePatch, RouteState};
use crate::router::{Mode, Navigation, Router};

type Component = &'static str;

const ORIGIN: &str = "https://site.test";

fn url(path: &str) -> Url {
  Url::parse(ORIGIN).unwrap().join(path).unwrap()
}

fn props(value: Value) -> Props {
  match value {
    Value::Object(map) => map,
    other => panic!("not an object: {other}"),
  }
}

// -- fake platform --

#[derive(Default)]
struct Shared {
  modules: RefCell<HashMap<String, ModuleRecord<Component>>>,
  gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
  json: RefCell<HashMap<String, Value>>,
  fetched: RefCell<Vec<String>>,
  pushed: RefCell<Vec<(String, u64)>>,
  hard: RefCell<Vec<String>>,
  location: RefCell<Option<Url>>,
  links: RefCell<Vec<Url>>,
  preloads: RefCell<Vec<PreloadLink>>,
  errors: RefCell<Vec<String>>,
}

#[derive(Clone)]
struct FakePlatform {
  shared: Rc<Shared>,
  spawner: LocalSpawner,
}

impl FakePlatform {
  fn new(spawner: LocalSpawner) -> Self {
    Self { shared: Rc::default(), spawner }
  }

  fn module(&self, url: &str, record: ModuleRecord<Component>) {
    self.shared.modules.borrow_mut().insert(url.to_string(), record);
  }

  /// The next load of `url` waits until the returned sender fires.
  fn gate_module(&self, url: &str) -> oneshot::Sender<()> {
    let (tx, rx) = oneshot::channel();
    self.shared.gates.borrow_mut().insert(url.to_string(), rx);
    tx
  }

  fn json(&self, url: &str, value: Value) {
    self.shared.json.borrow_mut().insert(url.to_string(), value);
  }

  fn manifest(&self, manifest: &Manifest) {
    self.json(MANIFEST_URL, serde_json::to_value(manifest).unwrap());
  }

  fn fetch_count(&self, url: &str) -> usize {
    self.shared.fetched.borrow().iter().filter(|u| *u == url).count()
  }

  fn set_location(&self, path: &str) {
    *self.shared.location.borrow_mut() = Some(url(path));
  }
}

impl Platform for FakePlatform {
  type Component = Component;

  fn load_module(
    &self,
    url: &str,
  ) -> LocalBoxFuture<'static, Result<ModuleRecord<Component>, PlatformError>> {
    let gate = self.shared.gates.borrow_mut().remove(url);
    let shared = Rc::clone(&self.shared);
    let url = url.to_string();
    Box::pin(async move {
      if let Some(gate) = gate {
        let _ = gate.await;
      }
      shared
        .modules
        .borrow()
        .get(&url)
        .cloned()
        .ok_or_else(|| PlatformError::new(format!("failed to import {url}")))
    })
  }

  fn fetch_json(&self, url: &str) -> LocalBoxFuture<'static, Result<Value, PlatformError>> {
    self.shared.fetched.borrow_mut().push(url.to_string());
    let result =
      self.shared.json.borrow().get(url).cloned().ok_or_else(|| PlatformError::new(format!("404 {url}")));
    Box::pin(future::ready(result))
  }

  fn delay(&self, _ms: u32) -> LocalBoxFuture<'static, ()> {
    Box::pin(future::ready(()))
  }

  fn spawn_local(&self, task: LocalBoxFuture<'static, ()>) {
    self.spawner.spawn_local(task).unwrap();
  }

  fn push_state(&self, href: &str, id: u64) {
    self.shared.pushed.borrow_mut().push((href.to_string(), id));
    *self.shared.location.borrow_mut() = Some(Url::parse(href).unwrap());
  }

  fn hard_navigate(&self, href: &str) {
    self.shared.hard.borrow_mut().push(href.to_string());
  }

  fn location(&self) -> Url {
    self.shared.location.borrow().clone().unwrap_or_else(|| url("/"))
  }

  fn links(&self) -> Vec<Url> {
    self.shared.links.borrow().clone()
  }

  fn insert_preload(&self, link: PreloadLink) {
    self.shared.preloads.borrow_mut().push(link);
  }

  fn report_error(&self, error: &PlatformError) {
    self.shared.errors.borrow_mut().push(error.to_string());
  }
}

// -- fake root --

#[derive(Clone, Default)]
struct FakeRoot {
  patches: Rc<RefCell<Vec<RoutePatch<Component>>>>,
}

impl FakeRoot {
  fn patches(&self) -> Vec<RoutePatch<Component>> {
    self.patches.borrow().clone()
  }
}

impl RootHandle<Component> for FakeRoot {
  fn update(&self, patch: RoutePatch<Component>) {
    self.patches.borrow_mut().push(patch);
  }
}

#[derive(Default)]
struct FakeMount {
  root: FakeRoot,
  mounted: RefCell<Vec<(RouteState<Component>, bool)>>,
}

impl Mount<Component> for FakeMount {
  type Root = FakeRoot;

  fn mount(&self, initial: RouteState<Component>, hydrate: bool) -> FakeRoot {
    self.mounted.borrow_mut().push((initial, hydrate));
    self.root.clone()
  }
}

// -- client fetch gate --

/// A `clientFetch` whose result is supplied by the test through the sender.
fn gated_client_fetch() -> (ClientFetch, oneshot::Sender<Result<Props, PlatformError>>, Rc<RefCell<Vec<Params>>>) {
  let (tx, rx) = oneshot::channel();
  let rx = Rc::new(RefCell::new(Some(rx)));
  let calls = Rc::new(RefCell::new(Vec::new()));
  let seen = Rc::clone(&calls);
  let client_fetch = ClientFetch::new(move |params| {
    seen.borrow_mut().push(params);
    let rx = rx.borrow_mut().take();
    Box::pin(async move {
      match rx {
        Some(rx) => rx.await.unwrap_or_else(|_| Err(PlatformError::new("dropped"))),
        None => Ok(Props::new()),
      }
    })
  });
  (client_fetch, tx, calls)
}

fn entry_module(name: Component, eager: bool, client_fetch: Option<ClientFetch>) -> ModuleRecord<Component> {
  ModuleRecord::Entry {
    page: PageModule { component: Some(name), eager, prefetch: false, client_fetch },
    route_props: RouteProps {
      page_component: Some(name),
      layout_component: None,
      app_layout_component: Some("App"),
    },
  }
}

fn production_manifest() -> Manifest {
  let mut manifest = Manifest::default();
  for (path, page_id) in [("/", "index"), ("/a", "a"), ("/b", "b")] {
    manifest.insert(
      path,
      ManifestEntry {
        page_id: page_id.into(),
        path: path.into(),
        js: format!("/assets/{page_id}.js"),
        preload_js: vec!["/assets/chunk-route.js".into()],
        data: (page_id == "b").then(|| "/assets/_data/b.json".to_string()),
        dev_layout_js: None,
      },
    );
  }
  manifest
}

struct Harness {
  pool: LocalPool,
  platform: FakePlatform,
  root: FakeRoot,
  router: Router<FakePlatform, FakeRoot>,
}

impl Harness {
  fn new(mode: Mode) -> Self {
    let pool = LocalPool::new();
    let platform = FakePlatform::new(pool.spawner());
    platform.manifest(&production_manifest());
    platform.json("/assets/_data/b.json", json!({"title": "B"}));
    let root = FakeRoot::default();
    let router = Router::new(platform.clone(), root.clone(), mode);
    Self { pool, platform, root, router }
  }

  /// Start a navigation in the background; its outcome lands in the slot.
  fn navigate(&mut self, path: &str) -> Rc<RefCell<Option<Navigation>>> {
    let slot = Rc::new(RefCell::new(None));
    let out = Rc::clone(&slot);
    let router = self.router.clone();
    let target = url(path);
    self
      .pool
      .spawner()
      .spawn_local(async move {
        let outcome = router.navigate(&target, true).await;
        *out.borrow_mut() = Some(outcome);
      })
      .unwrap();
    self.pool.run_until_stalled();
    slot
  }

  fn settle(&mut self) {
    self.pool.run_until_stalled();
  }
}

// -- freshness --

#[test]
fn rapid_double_navigation_only_latest_commits() {
  let mut h = Harness::new(Mode::Production);
  h.platform.module("/assets/a.js", entry_module("A", false, None));
  h.platform.module("/assets/b.js", entry_module("B", false, None));
  let release_a = h.platform.gate_module("/assets/a.js");

  let a = h.navigate("/a");
  assert!(a.borrow().is_none(), "A should still be waiting on its import");
  let b = h.navigate("/b");
  assert_eq!(*b.borrow(), Some(Navigation::Committed));

  release_a.send(()).unwrap();
  h.settle();

  assert_eq!(*a.borrow(), Some(Navigation::Superseded));
  let patches = h.root.patches();
  assert_eq!(patches.len(), 1);
  assert_eq!(patches[0].page_id.as_deref(), Some("b"));
  assert_eq!(patches[0].components.as_ref().unwrap().page_component, Some("B"));
  assert!(h.platform.shared.errors.borrow().is_empty());
}

#[test]
fn history_pushed_before_load_completes() {
  let mut h = Harness::new(Mode::Production);
  h.platform.module("/assets/a.js", entry_module("A", false, None));
  let _gate = h.platform.gate_module("/assets/a.js");

  let a = h.navigate("/a?x=1");
  assert!(a.borrow().is_none());
  let pushed = h.platform.shared.pushed.borrow().clone();
  assert_eq!(pushed, vec![(format!("{ORIGIN}/a?x=1"), 1)]);
  assert!(h.root.patches().is_empty());
}

#[test]
fn superseded_while_client_fetch_pending() {
  let mut h = Harness::new(Mode::Production);
  let (client_fetch, release, _) = gated_client_fetch();
  h.platform.module("/assets/a.js", entry_module("A", false, Some(client_fetch)));
  h.platform.module("/assets/b.js", entry_module("B", false, None));

  let a = h.navigate("/a");
  let b = h.navigate("/b");
  release.send(Ok(props(json!({"late": true})))).unwrap();
  h.settle();

  assert_eq!(*a.borrow(), Some(Navigation::Superseded));
  assert_eq!(*b.borrow(), Some(Navigation::Committed));
  let patches = h.root.patches();
  assert_eq!(patches.len(), 1);
  assert_eq!(patches[0].page_id.as_deref(), Some("b"));
}

#[test]
fn navigation_ids_increase() {
  let mut h = Harness::new(Mode::Production);
  h.platform.module("/assets/a.js", entry_module("A", false, None));
  assert_eq!(h.router.current_id(), 0);
  h.navigate("/a");
  h.navigate("/a");
  assert_eq!(h.router.current_id(), 2);
  let ids: Vec<u64> = h.platform.shared.pushed.borrow().iter().map(|(_, id)| *id).collect();
  assert_eq!(ids, vec![1, 2]);
}

// -- commit protocol --

#[test]
fn eager_page_swaps_before_client_fetch() {
  let mut h = Harness::new(Mode::Production);
  let (client_fetch, release, _) = gated_client_fetch();
  h.platform.module("/assets/b.js", entry_module("B", true, Some(client_fetch)));

  let nav = h.navigate("/b");
  let patches = h.root.patches();
  assert_eq!(patches.len(), 1, "eager swap must not wait for clientFetch");
  assert_eq!(patches[0].fetching, Some(true));
  assert_eq!(patches[0].components.as_ref().unwrap().page_component, Some("B"));
  assert_eq!(patches[0].page_props, Some(props(json!({"title": "B"}))));

  release.send(Ok(props(json!({"user": "ada"})))).unwrap();
  h.settle();

  assert_eq!(*nav.borrow(), Some(Navigation::Committed));
  let patches = h.root.patches();
  assert_eq!(patches.len(), 2);
  assert_eq!(patches[1].fetching, Some(false));
  assert!(patches[1].components.is_none(), "components already swapped");
  assert_eq!(patches[1].page_props, Some(props(json!({"title": "B", "user": "ada"}))));
}

#[test]
fn non_eager_page_waits_for_client_fetch() {
  let mut h = Harness::new(Mode::Production);
  let (client_fetch, release, calls) = gated_client_fetch();
  h.platform.module("/assets/b.js", entry_module("B", false, Some(client_fetch)));

  h.navigate("/b?tag=x&tag=y");
  assert!(h.root.patches().is_empty(), "no swap before clientFetch resolves");

  release.send(Ok(props(json!({"title": "client"})))).unwrap();
  h.settle();

  let patches = h.root.patches();
  assert_eq!(patches.len(), 1);
  let patch = &patches[0];
  assert_eq!(patch.fetching, Some(false));
  assert_eq!(patch.pathname.as_deref(), Some("/b"));
  assert_eq!(patch.client_fetch_error, Some(false));
  assert_eq!(patch.components.as_ref().unwrap().app_layout_component, Some("App"));
  assert_eq!(patch.page_props, Some(props(json!({"title": "client"}))));

  let calls = calls.borrow();
  assert_eq!(serde_json::to_value(&calls[0]).unwrap(), json!({"tag": ["x", "y"]}));
}

#[test]
fn client_fetch_error_degrades() {
  let mut h = Harness::new(Mode::Production);
  let (client_fetch, release, _) = gated_client_fetch();
  h.platform.module("/assets/b.js", entry_module("B", false, Some(client_fetch)));

  let nav = h.navigate("/b");
  release.send(Err(PlatformError::new("boom"))).unwrap();
  h.settle();

  assert_eq!(*nav.borrow(), Some(Navigation::Committed));
  let patches = h.root.patches();
  assert_eq!(patches.len(), 1);
  assert_eq!(patches[0].client_fetch_error, Some(true));
  assert_eq!(patches[0].fetching, Some(false));
  assert_eq!(patches[0].page_props, Some(props(json!({"title": "B"}))));
  assert_eq!(*h.platform.shared.errors.borrow(), vec!["boom".to_string()]);
}

#[test]
fn trailing_slash_hits_same_entry() {
  let mut h = Harness::new(Mode::Production);
  h.platform.module("/assets/a.js", entry_module("A", false, None));
  let nav = h.navigate("/a/");
  assert_eq!(*nav.borrow(), Some(Navigation::Committed));
  assert_eq!(h.root.patches()[0].pathname.as_deref(), Some("/a"));
}

#[test]
fn unmatched_route_is_left_alone() {
  let mut h = Harness::new(Mode::Production);
  let nav = h.navigate("/missing");
  assert_eq!(*nav.borrow(), Some(Navigation::Unmatched));
  assert!(h.root.patches().is_empty());
  assert!(h.platform.shared.errors.borrow().is_empty());
}

#[test]
fn failed_import_reports() {
  let mut h = Harness::new(Mode::Production);
  let nav = h.navigate("/a");
  assert!(matches!(*nav.borrow(), Some(Navigation::Failed(_))));
  assert!(h.root.patches().is_empty());
  assert_eq!(h.platform.shared.errors.borrow().len(), 1);
}

#[test]
fn production_manifest_fetched_once() {
  let mut h = Harness::new(Mode::Production);
  h.platform.module("/assets/a.js", entry_module("A", false, None));
  h.navigate("/a");
  h.navigate("/a");
  assert_eq!(h.platform.fetch_count(MANIFEST_URL), 1);
}

// -- dev mode --

fn dev_manifest() -> Manifest {
  let mut manifest = Manifest {
    dev_app_layout_url: Some("/routes/_app.svelte".into()),
    ..Default::default()
  };
  manifest.insert(
    "/blog/post-1",
    ManifestEntry {
      page_id: "blog/post-1".into(),
      path: "/blog/post-1".into(),
      js: "/routes/blog/post-1.svelte".into(),
      dev_layout_js: Some("/routes/blog/_layout.svelte".into()),
      ..Default::default()
    },
  );
  manifest
}

#[test]
fn dev_navigation_tolerates_missing_app_layout() {
  let mut h = Harness::new(Mode::Dev);
  h.platform.manifest(&dev_manifest());
  h.platform.module(
    "/routes/blog/post-1.svelte",
    ModuleRecord::Component(PageModule { prefetch: true, ..PageModule::new("Post") }),
  );
  h.platform.module("/routes/blog/_layout.svelte", ModuleRecord::Component(PageModule::new("BlogLayout")));
  h.platform.json("/_dev_prefetch/blog/post-1", json!({"count": 1}));

  let nav = h.navigate("/blog/post-1/");
  assert_eq!(*nav.borrow(), Some(Navigation::Committed));

  let patches = h.root.patches();
  assert_eq!(patches.len(), 1);
  let components = patches[0].components.as_ref().unwrap();
  assert_eq!(components.page_component, Some("Post"));
  assert_eq!(components.layout_component, Some("BlogLayout"));
  assert_eq!(components.app_layout_component, None);
  assert_eq!(patches[0].page_props, Some(props(json!({"count": 1}))));
  assert!(h.platform.shared.errors.borrow().is_empty());
}

#[test]
fn dev_manifest_refetched_every_navigation() {
  let mut h = Harness::new(Mode::Dev);
  h.platform.manifest(&dev_manifest());
  h.platform.module("/routes/blog/post-1.svelte", ModuleRecord::Component(PageModule::new("Post")));
  h.navigate("/blog/post-1");
  h.navigate("/blog/post-1");
  assert_eq!(h.platform.fetch_count(MANIFEST_URL), 2);
  assert_eq!(h.platform.fetch_count("/_dev_prefetch/blog/post-1"), 0);
}

#[test]
fn dev_navigation_fails_without_page_module() {
  let mut h = Harness::new(Mode::Dev);
  h.platform.manifest(&dev_manifest());
  let nav = h.navigate("/blog/post-1");
  assert!(matches!(*nav.borrow(), Some(Navigation::Failed(_))));
}

#[test]
fn clicked_route_removed_from_dev_manifest_loads_from_server() {
  let mut h = Harness::new(Mode::Dev);
  h.platform.manifest(&dev_manifest());
  h.platform.set_location("/");
  let router = h.router.clone();
  h.pool.run_until(async move { router.manifest().await.map(|_| ()) }).unwrap();
  assert!(h.router.intercepts(&url("/blog/post-1")));

  // page deleted between the click check and the fresh manifest fetch
  h.platform.manifest(&Manifest::default());
  let router = h.router.clone();
  let target = url("/blog/post-1");
  let outcome = h.pool.run_until(async move { router.follow(&target).await });

  assert_eq!(outcome, Navigation::Unmatched);
  assert!(h.root.patches().is_empty());
  assert_eq!(*h.platform.shared.hard.borrow(), vec![format!("{ORIGIN}/blog/post-1")]);
}

#[test]
fn followed_link_that_commits_stays_client_side() {
  let mut h = Harness::new(Mode::Production);
  h.platform.module("/assets/a.js", entry_module("A", false, None));
  let router = h.router.clone();
  let target = url("/a");
  let outcome = h.pool.run_until(async move { router.follow(&target).await });
  assert_eq!(outcome, Navigation::Committed);
  assert!(h.platform.shared.hard.borrow().is_empty());
}

#[test]
fn followed_link_that_fails_to_load_falls_back() {
  let mut h = Harness::new(Mode::Dev);
  h.platform.manifest(&dev_manifest());
  let router = h.router.clone();
  let target = url("/blog/post-1");
  let outcome = h.pool.run_until(async move { router.follow(&target).await });
  assert!(matches!(outcome, Navigation::Failed(_)));
  assert_eq!(h.platform.shared.hard.borrow().len(), 1);
}

// -- start-up --

fn start_with(
  pool: &LocalPool,
  mode: Mode,
  page: PageModule<Component>,
  page_props: Props,
) -> (FakePlatform, FakeMount, Router<FakePlatform, FakeRoot>) {
  let platform = FakePlatform::new(pool.spawner());
  platform.manifest(&production_manifest());
  let mount = FakeMount::default();
  let router = hydrate::start(
    platform.clone(),
    &mount,
    StartOptions {
      page_id: "index".into(),
      page,
      route_props: RouteProps { page_component: Some("Index"), ..Default::default() },
      page_props,
      hydrate: true,
      mode,
    },
  );
  (platform, mount, router)
}

#[test]
fn hydrated_page_without_client_fetch_is_untouched() {
  let mut pool = LocalPool::new();
  let (_platform, mount, _router) =
    start_with(&pool, Mode::Production, PageModule::new("Index"), props(json!({"count": 1})));
  pool.run_until_stalled();

  let mounted = mount.mounted.borrow();
  assert_eq!(mounted.len(), 1);
  let (initial, hydrate) = &mounted[0];
  assert!(*hydrate);
  assert!(initial.fetching);
  assert_eq!(initial.page_id, "index");
  assert_eq!(initial.page_props, props(json!({"count": 1})));
  assert!(mount.root.patches().is_empty());
}

#[test]
fn bootstrap_runs_client_fetch() {
  let mut pool = LocalPool::new();
  let (client_fetch, release, _) = gated_client_fetch();
  let page = PageModule { client_fetch: Some(client_fetch), ..PageModule::new("Index") };
  let (_platform, mount, _router) = start_with(&pool, Mode::Production, page, props(json!({"count": 1})));
  pool.run_until_stalled();

  assert_eq!(mount.root.patches()[0].fetching, Some(true));
  release.send(Ok(props(json!({"count": 2, "extra": true})))).unwrap();
  pool.run_until_stalled();

  let patches = mount.root.patches();
  assert_eq!(patches.len(), 2);
  assert_eq!(patches[1].fetching, Some(false));
  assert_eq!(patches[1].page_props, Some(props(json!({"count": 2, "extra": true}))));
}

#[test]
fn bootstrap_superseded_by_navigation() {
  let mut pool = LocalPool::new();
  let (client_fetch, release, _) = gated_client_fetch();
  let page = PageModule { client_fetch: Some(client_fetch), ..PageModule::new("Index") };
  let (platform, mount, router) = start_with(&pool, Mode::Production, page, Props::new());
  platform.module("/assets/a.js", entry_module("A", false, None));
  pool.run_until_stalled();

  pool.run_until(router.navigate(&url("/a"), true));
  release.send(Ok(props(json!({"stale": true})))).unwrap();
  pool.run_until_stalled();

  let patches = mount.root.patches();
  assert_eq!(patches.len(), 2, "fetching flag, then the navigation commit");
  assert_eq!(patches[1].page_id.as_deref(), Some("a"));
}

#[test]
fn production_start_warms_manifest_and_preloads() {
  let mut pool = LocalPool::new();
  let (platform, _mount, router) =
    start_with(&pool, Mode::Production, PageModule::new("Index"), Props::new());
  *platform.shared.links.borrow_mut() = vec![url("/b")];
  pool.run_until_stalled();

  assert_eq!(platform.fetch_count(MANIFEST_URL), 1);
  assert!(router.intercepts(&url("/b")));
  assert!(platform.shared.preloads.borrow().contains(&PreloadLink::Module("/assets/b.js".into())));
}

// -- preloading and interception --

#[test]
fn preload_inserts_each_route_once() {
  let mut h = Harness::new(Mode::Production);
  h.platform.set_location("/");
  *h.platform.shared.links.borrow_mut() = vec![
    url("/a"),
    url("/a/"),
    url("/b"),
    url("/"),
    url("/missing"),
    Url::parse("https://elsewhere.test/a").unwrap(),
  ];

  h.pool.run_until(h.router.preload());
  h.pool.run_until(h.router.preload());

  let preloads = h.platform.shared.preloads.borrow().clone();
  assert_eq!(
    preloads,
    vec![
      PreloadLink::Module("/assets/a.js".into()),
      PreloadLink::Module("/assets/chunk-route.js".into()),
      PreloadLink::Module("/assets/b.js".into()),
      PreloadLink::Module("/assets/chunk-route.js".into()),
      PreloadLink::Fetch("/assets/_data/b.json".into()),
    ]
  );
}

#[test]
fn committed_navigation_schedules_preload() {
  let mut h = Harness::new(Mode::Production);
  h.platform.module("/assets/a.js", entry_module("A", false, None));
  *h.platform.shared.links.borrow_mut() = vec![url("/b")];
  h.navigate("/a");
  assert!(h.platform.shared.preloads.borrow().contains(&PreloadLink::Fetch("/assets/_data/b.json".into())));
}

#[test]
fn intercepts_known_same_origin_routes() {
  let mut h = Harness::new(Mode::Production);
  h.platform.set_location("/a");
  assert!(!h.router.intercepts(&url("/b")), "no manifest seen yet");

  let router = h.router.clone();
  h.pool.run_until(async move { router.manifest().await.map(|_| ()) }).unwrap();
  assert!(h.router.intercepts(&url("/b")));
  assert!(h.router.intercepts(&url("/b/?q=1")));
  assert!(!h.router.intercepts(&url("/a/")), "same page");
  assert!(!h.router.intercepts(&url("/missing")));
  assert!(!h.router.intercepts(&Url::parse("https://elsewhere.test/b").unwrap()));
}
