/* src/site/rust/src/entry.rs */

use std::fmt::Write as _;

/// Inputs of one generated client entry module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntrySpec {
  pub page_id: String,
  /// App-wide side-effect module imported first, if the project has one.
  pub index_module: Option<String>,
  pub page_module: String,
  pub layout_module: Option<String>,
  pub app_layout_module: Option<String>,
  /// The Route root component.
  pub route_module: String,
  /// The client router runtime, imported lazily in SPA mode.
  pub runtime_module: String,
  pub spa: bool,
  pub dev: bool,
}

/// JS string literal that is also safe inside an inline `<script>`.
fn js_string(value: &str) -> String {
  let quoted = serde_json::Value::String(value.to_string()).to_string();
  quoted.replace('<', "\\u003c").replace('\u{2028}', "\\u2028").replace('\u{2029}', "\\u2029")
}

/// Source of the per-page entry module.
///
/// It exports `page` (the page module namespace), `routeProps()` and
/// `start({ pageProps, hydrate })`. `start` mounts the Route root on
/// `document.body` and, in SPA mode, hands it to the router runtime.
pub fn generate_entry(spec: &EntrySpec) -> String {
  let mut code = String::from("// generated by pagewright\n");
  if let Some(index) = &spec.index_module {
    let _ = writeln!(code, "import {};", js_string(index));
  }
  let _ = writeln!(code, "import Route from {};", js_string(&spec.route_module));
  let _ = writeln!(code, "import * as page from {};", js_string(&spec.page_module));
  match &spec.layout_module {
    Some(layout) => {
      let _ = writeln!(code, "import Layout from {};", js_string(layout));
    }
    None => code.push_str("const Layout = null;\n"),
  }
  match &spec.app_layout_module {
    Some(app_layout) => {
      let _ = writeln!(code, "import AppLayout from {};", js_string(app_layout));
    }
    None => code.push_str("const AppLayout = null;\n"),
  }

  let _ = write!(
    code,
    r#"
const start = ({{ pageProps, hydrate }}) => {{
  const root = new Route({{
    target: document.body,
    hydrate,
    props: {{
      ...routeProps(),
      pageId: {page_id},
      fetching: true,
      pageProps
    }}
  }});
"#,
    page_id = js_string(&spec.page_id),
  );
  if spec.spa {
    let _ = write!(
      code,
      r#"
  import({runtime})
    .then(m => m.start({{
      root,
      dev: {dev},
      page,
      pageProps,
      importModule: (url) => import(/* @vite-ignore */ url)
    }}));
"#,
      runtime = js_string(&spec.runtime_module),
      dev = spec.dev,
    );
  }
  code.push_str(
    r"};

const routeProps = () => ({
  appLayoutComponent: AppLayout,
  layoutComponent: Layout,
  pageComponent: page.default,
});

export { page, start, routeProps };
",
  );
  code
}
