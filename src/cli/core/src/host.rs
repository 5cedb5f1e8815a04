/* src/cli/core/src/host.rs */

// Component host backed by a long-running JS process.
//
// Requests and replies are single JSON lines:
//   -> {"id":1,"op":"load","specifier":"/routes/index.svelte"}
//   <- {"id":1,"ok":true,"result":{"hasDefault":true,...}}
//   <- {"id":1,"ok":false,"error":{"message":"...","stack":"..."}}
// Lines on stdout that are not replies are forwarded to the terminal.

use std::collections::HashMap;
use std::path::Path;
use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use pagewright_renderer::{
  BoxFuture, ComponentHost, HostError, ModuleInfo, PrefetchArgs, RenderOutput, RouteRenderRequest,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, Command};
use tokio::sync::oneshot;

use crate::process::pipe_lines;
use crate::shell::{find_script, js_runtime};
use crate::ui::{DIM, RESET};

const LABEL: &str = "host";

#[derive(Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
enum Op<'a> {
  Load { specifier: &'a str },
  Prefetch { specifier: &'a str, args: PrefetchArgs },
  Render { request: RouteRenderRequest },
}

#[derive(Serialize)]
struct Request<'a> {
  id: u64,
  #[serde(flatten)]
  op: Op<'a>,
}

#[derive(Deserialize)]
struct Reply {
  id: u64,
  #[serde(default)]
  ok: bool,
  #[serde(default)]
  result: Value,
  #[serde(default)]
  error: Option<ReplyError>,
}

#[derive(Deserialize)]
struct ReplyError {
  message: String,
  #[serde(default)]
  stack: Option<String>,
}

impl Reply {
  fn into_result(self) -> Result<Value, HostError> {
    if self.ok {
      return Ok(self.result);
    }
    Err(match self.error {
      Some(e) => HostError::with_stack(e.message, e.stack),
      None => HostError::new("component host reported an unknown error"),
    })
  }
}

type Sender = oneshot::Sender<Result<Value, HostError>>;
type Pending = Mutex<HashMap<u64, Sender>>;

struct Inner {
  stdin: tokio::sync::Mutex<ChildStdin>,
  pending: Pending,
  next_id: AtomicU64,
  closed: AtomicBool,
}

impl Inner {
  /// `closed` is only set with the pending lock held, so a sender is either
  /// registered before the drain or refused.
  fn fail_pending(&self, message: &str) {
    let drained: Vec<_> = match self.pending.lock() {
      Ok(mut pending) => {
        self.closed.store(true, Ordering::SeqCst);
        pending.drain().collect()
      }
      Err(_) => {
        self.closed.store(true, Ordering::SeqCst);
        return;
      }
    };
    for (_, tx) in drained {
      let _ = tx.send(Err(HostError::new(message)));
    }
  }

  fn register(&self, id: u64, tx: Sender) -> Result<(), HostError> {
    let mut pending = self.pending.lock().map_err(|_| HostError::new("component host state poisoned"))?;
    if self.closed.load(Ordering::SeqCst) {
      return Err(HostError::new("component host is not running"));
    }
    pending.insert(id, tx);
    Ok(())
  }

  fn resolve(&self, reply: Reply) {
    let tx = self.pending.lock().ok().and_then(|mut pending| pending.remove(&reply.id));
    if let Some(tx) = tx {
      let _ = tx.send(reply.into_result());
    }
  }
}

pub struct NodeHost {
  inner: Arc<Inner>,
  _child: Mutex<Child>,
}

impl NodeHost {
  /// Start the host script. `module_server` is the origin of the dev module
  /// server when running under `dev`.
  pub fn spawn(root: &Path, host_script: &str, module_server: Option<&str>) -> Result<Self> {
    let script = find_script(root, host_script, "host_script")?;
    let mut cmd = Command::new(js_runtime());
    cmd.arg(&script).arg("--root").arg(root);
    if let Some(origin) = module_server {
      cmd.args(["--dev", "--module-server", origin]);
    }
    cmd.current_dir(root);
    cmd.stdin(Stdio::piped());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());
    cmd.kill_on_drop(true);

    let mut child = cmd.spawn().with_context(|| format!("failed to start {}", script.display()))?;
    let stdin = child.stdin.take().context("host stdin not captured")?;
    let stdout = child.stdout.take().context("host stdout not captured")?;
    if let Some(stderr) = child.stderr.take() {
      pipe_lines(LABEL, stderr, true);
    }

    let inner = Arc::new(Inner {
      stdin: tokio::sync::Mutex::new(stdin),
      pending: Mutex::new(HashMap::new()),
      next_id: AtomicU64::new(1),
      closed: AtomicBool::new(false),
    });

    let reader = inner.clone();
    tokio::spawn(async move {
      let mut lines = BufReader::new(stdout).lines();
      while let Ok(Some(line)) = lines.next_line().await {
        match serde_json::from_str::<Reply>(&line) {
          Ok(reply) => reader.resolve(reply),
          Err(_) => println!("  {DIM}{LABEL:>8}{RESET} {line}"),
        }
      }
      reader.fail_pending("component host exited");
    });

    Ok(Self { inner, _child: Mutex::new(child) })
  }

  fn call<T>(&self, op: Op<'_>) -> BoxFuture<Result<T, HostError>>
  where
    T: DeserializeOwned + Send + 'static,
  {
    let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);
    let line = match serde_json::to_string(&Request { id, op }) {
      Ok(mut line) => {
        line.push('\n');
        line
      }
      Err(e) => return Box::pin(async move { Err(HostError::new(e.to_string())) }),
    };
    let (tx, rx) = oneshot::channel();
    if let Err(e) = self.inner.register(id, tx) {
      return Box::pin(async move { Err(e) });
    }
    let inner = self.inner.clone();
    Box::pin(async move {
      {
        let mut stdin = inner.stdin.lock().await;
        if let Err(e) = stdin.write_all(line.as_bytes()).await {
          inner.fail_pending("component host exited");
          return Err(HostError::new(format!("failed to write to component host: {e}")));
        }
        let _ = stdin.flush().await;
      }
      let value = rx.await.map_err(|_| HostError::new("component host dropped the request"))??;
      serde_json::from_value(value).map_err(|e| HostError::new(format!("malformed host reply: {e}")))
    })
  }
}

impl ComponentHost for NodeHost {
  fn load_module(&self, specifier: &str) -> BoxFuture<Result<ModuleInfo, HostError>> {
    self.call(Op::Load { specifier })
  }

  fn prefetch(&self, specifier: &str, args: PrefetchArgs) -> BoxFuture<Result<Option<Value>, HostError>> {
    self.call(Op::Prefetch { specifier, args })
  }

  fn render_route(&self, request: RouteRenderRequest) -> BoxFuture<Result<RenderOutput, HostError>> {
    self.call(Op::Render { request })
  }
}
