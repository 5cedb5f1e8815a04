/* src/cli/core/src/dev/mod.rs */

mod server;
mod ui;


use std::sync::Arc;

use anyhow::Result;
use pagewright_renderer::Renderer;
use tokio::signal;

use crate::host::NodeHost;
use crate::process::{ChildProcess, label_color, pipe_output, spawn_child, wait_any};
use crate::project::Project;
use crate::ui::{DIM, RED, RESET};

use server::{DevState, start_dev_server};
use ui::print_dev_banner;

pub async fn run_dev(project: Project) -> Result<()> {
  if !project.routes_dir().is_dir() {
    crate::ui::warn(&format!(
      "{} does not exist -- run `pagewright init` to scaffold a project",
      project.routes_dir().display()
    ));
  }
  print_dev_banner(&project);

  let dev = project.config.dev.clone();
  let module_origin = format!("http://localhost:{}", dev.module_server_port);

  let mut children: Vec<ChildProcess> = Vec::new();
  if let Some(cmd) = &dev.module_command {
    let port_str = dev.module_server_port.to_string();
    let mut proc = spawn_child("modules", cmd, &project.root, &[("PORT", &port_str)])?;
    pipe_output(&mut proc);
    children.push(proc);
  }

  let host = NodeHost::spawn(&project.root, &project.config.runtime.host_script, Some(&module_origin))?;
  let state = DevState {
    project: Arc::new(project),
    renderer: Renderer::new(Arc::new(host)),
    module_origin,
    client: reqwest::Client::new(),
  };

  let children_exit = async {
    if children.is_empty() {
      std::future::pending().await
    } else {
      wait_any(&mut children).await
    }
  };

  // Wait for Ctrl+C, child exit, or dev server error
  tokio::select! {
    _ = signal::ctrl_c() => {
      println!();
      println!("  {DIM}shutting down...{RESET}");
    }
    (label, status) = children_exit => {
      let color = label_color(label);
      match status {
        Ok(s) if s.success() => println!("  {color}{label}{RESET} exited"),
        Ok(s) => println!("  {RED}{label} exited with {s}{RESET}"),
        Err(e) => println!("  {RED}{label} error: {e}{RESET}"),
      }
    }
    result = start_dev_server(state, dev.port) => {
      if let Err(e) = result {
        println!("  {RED}dev server error: {e}{RESET}");
      }
    }
  }

  Ok(())
}
