/* src/cli/core/src/dev/ui.rs */

use crate::project::Project;
use crate::ui::{BOLD, CYAN, DIM, GREEN, MAGENTA, RESET, YELLOW};

pub(super) fn print_dev_banner(project: &Project) {
  let dev = &project.config.dev;
  crate::ui::banner("dev", &project.name);

  println!("  {CYAN}routes{RESET}    {DIM}{}{RESET}", project.routes_dir().display());
  match &dev.module_command {
    Some(cmd) => println!("  {MAGENTA}modules{RESET}   {DIM}{cmd}{RESET} {DIM}:{}{RESET}", dev.module_server_port),
    None => println!("  {MAGENTA}modules{RESET}   {DIM}external :{}{RESET}", dev.module_server_port),
  }
  println!("  {YELLOW}proxy{RESET}     {DIM}:{} \u{2192} :{}{RESET}", dev.port, dev.module_server_port);

  println!();
  println!("  {GREEN}\u{2192}{RESET} {BOLD}http://localhost:{}{RESET}", dev.port);
  println!();
}
