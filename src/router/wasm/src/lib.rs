/* src/router/wasm/src/lib.rs */

mod convert;
mod platform;
mod root;

use js_sys::{Function, Promise};
use pagewright_router::{Mode, Navigation, PageModule, Platform, Props, Router, StartOptions};
use url::Url;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, Event, HtmlAnchorElement, MouseEvent};

use convert::{get, page_module, route_props, to_props};
use platform::WebPlatform;
use root::{JsMount, JsRoot};

type WebRouter = Router<WebPlatform, JsRoot>;

#[wasm_bindgen]
pub struct ClientRouter {
  router: WebRouter,
}

#[wasm_bindgen]
impl ClientRouter {
  /// Resolves to "committed", "superseded", "unmatched" or "failed".
  pub fn navigate(&self, href: &str, push: bool) -> Result<Promise, JsValue> {
    let url = Url::parse(href).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let router = self.router.clone();
    Ok(wasm_bindgen_futures::future_to_promise(async move {
      let outcome = match router.navigate(&url, push).await {
        Navigation::Committed => "committed",
        Navigation::Superseded => "superseded",
        Navigation::Unmatched => "unmatched",
        Navigation::Failed(_) => "failed",
      };
      Ok(JsValue::from_str(outcome))
    }))
  }

  pub fn intercepts(&self, href: &str) -> bool {
    Url::parse(href).is_ok_and(|url| self.router.intercepts(&url))
  }

  #[wasm_bindgen(js_name = currentId)]
  pub fn current_id(&self) -> f64 {
    self.router.current_id() as f64
  }
}

fn required_function(options: &JsValue, key: &str) -> Result<Function, JsValue> {
  get(options, key)
    .dyn_into::<Function>()
    .map_err(|_| JsValue::from_str(&format!("start options: `{key}` must be a function")))
}

fn mode(options: &JsValue) -> Mode {
  if get(options, "dev").is_truthy() { Mode::Dev } else { Mode::Production }
}

fn page_props(options: &JsValue) -> Result<Props, JsValue> {
  to_props(&get(options, "pageProps")).map_err(|e| JsValue::from_str(e.message()))
}

/// Router start for an already-mounted Route root.
///
/// Options: `{ root, dev, page, pageProps, importModule }`.
#[wasm_bindgen]
pub fn start(options: JsValue) -> Result<ClientRouter, JsValue> {
  let platform = WebPlatform::new(required_function(&options, "importModule")?)?;
  let page: PageModule<JsValue> = page_module(&get(&options, "page"));
  let router = Router::new(platform, JsRoot::new(get(&options, "root")), mode(&options));
  router.start(page, page_props(&options)?);
  listen(&router)?;
  Ok(ClientRouter { router })
}

/// Mount the Route root through the host and start the router.
///
/// Generated page entries use [`start`] with a root they constructed. This
/// export is for hosts that hand over a `mount(props, hydrate)` callback
/// instead.
///
/// Options: `{ mount, pageId, page, routeProps, pageProps, hydrate, dev, importModule }`.
#[wasm_bindgen]
pub fn hydrate(options: JsValue) -> Result<ClientRouter, JsValue> {
  let platform = WebPlatform::new(required_function(&options, "importModule")?)?;
  let mount = JsMount::new(required_function(&options, "mount")?);
  let route_props = match get(&options, "routeProps").dyn_into::<Function>() {
    Ok(f) => route_props(&f.call0(&JsValue::NULL)?),
    Err(value) => route_props(&value),
  };
  let router = pagewright_router::start(
    platform,
    &mount,
    StartOptions {
      page_id: get(&options, "pageId").as_string().unwrap_or_default(),
      page: page_module(&get(&options, "page")),
      route_props,
      page_props: page_props(&options)?,
      hydrate: get(&options, "hydrate").is_truthy(),
      mode: mode(&options),
    },
  );
  listen(&router)?;
  Ok(ClientRouter { router })
}

fn listen(router: &WebRouter) -> Result<(), JsValue> {
  let window = router.platform().window().clone();

  let on_pop = {
    let router = router.clone();
    Closure::<dyn FnMut(Event)>::new(move |_: Event| {
      let router = router.clone();
      let url = router.platform().location();
      wasm_bindgen_futures::spawn_local(async move {
        router.navigate(&url, false).await;
      });
    })
  };
  window.add_event_listener_with_callback("popstate", on_pop.as_ref().unchecked_ref())?;
  on_pop.forget();

  let on_click = {
    let router = router.clone();
    Closure::<dyn FnMut(MouseEvent)>::new(move |event: MouseEvent| on_click(&router, &event))
  };
  window.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
  on_click.forget();
  Ok(())
}

fn clicked_anchor(event: &MouseEvent) -> Option<HtmlAnchorElement> {
  let element = event.target()?.dyn_into::<Element>().ok()?;
  element.closest("a[href]").ok().flatten()?.dyn_into::<HtmlAnchorElement>().ok()
}

fn on_click(router: &WebRouter, event: &MouseEvent) {
  let modified = event.meta_key() || event.ctrl_key() || event.shift_key() || event.alt_key();
  if event.default_prevented() || event.button() != 0 || modified {
    return;
  }
  let Some(anchor) = clicked_anchor(event) else {
    return;
  };
  let target = anchor.target();
  if !target.is_empty() && target != "_self" {
    return;
  }
  let Ok(url) = Url::parse(&anchor.href()) else {
    return;
  };
  if !router.intercepts(&url) {
    return;
  }

  event.prevent_default();
  let router = router.clone();
  wasm_bindgen_futures::spawn_local(async move {
    router.follow(&url).await;
  });
}
