// Process inspection and termination

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Executable name of the running game.
pub const GAME_PROCESS: &str = "League of Legends.exe";

#[cfg(target_os = "windows")]
const CREATE_NO_WINDOW: u32 = 0x08000000;

#[async_trait]
pub trait ProcessControl: Send + Sync {
  async fn is_running(&self, name: &str) -> bool;
  async fn terminate(&self, name: &str);
}

/// Shells out to `tasklist`/`taskkill` on Windows and `pgrep`/`pkill` elsewhere.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemProcesses;

impl SystemProcesses {
  fn command(program: &str) -> Command {
    #[allow(unused_mut)]
    let mut command = Command::new(program);
    #[cfg(target_os = "windows")]
    command.creation_flags(CREATE_NO_WINDOW);
    command.stdin(Stdio::null()).stderr(Stdio::null());
    command
  }
}

#[async_trait]
impl ProcessControl for SystemProcesses {
  #[cfg(target_os = "windows")]
  async fn is_running(&self, name: &str) -> bool {
    let filter = format!("IMAGENAME eq {}", name);
    match Self::command("tasklist")
      .args(["/FI", &filter, "/NH"])
      .output()
      .await
    {
      Ok(output) => {
        let running = String::from_utf8_lossy(&output.stdout).contains(name);
        debug!("Process {} is running = {}", name, running);
        running
      }
      Err(e) => {
        warn!("Failed to query process list: {}", e);
        false
      }
    }
  }

  #[cfg(not(target_os = "windows"))]
  async fn is_running(&self, name: &str) -> bool {
    match Self::command("pgrep").args(["-x", name]).output().await {
      Ok(output) => {
        let running = output.status.success();
        debug!("Process {} is running = {}", name, running);
        running
      }
      Err(e) => {
        warn!("Failed to query process list: {}", e);
        false
      }
    }
  }

  async fn terminate(&self, name: &str) {
    info!("Terminating {}", name);
    #[cfg(target_os = "windows")]
    let status = Self::command("taskkill")
      .args(["/IM", name, "/F"])
      .stdout(Stdio::null())
      .status()
      .await;
    #[cfg(not(target_os = "windows"))]
    let status = Self::command("pkill")
      .args(["-x", name])
      .stdout(Stdio::null())
      .status()
      .await;

    match status {
      Ok(status) if status.success() => {}
      Ok(status) => warn!("Terminating {} exited with {}", name, status),
      Err(e) => warn!("Failed to terminate {}: {}", name, e),
    }
  }
}
