// Keyboard and mouse capability used by gameplay steps

use std::fmt;

use tracing::info;

/// Fraction of the game window size, `(0.0, 0.0)` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRatio {
  pub x: f64,
  pub y: f64,
}

impl WindowRatio {
  pub const CENTER: WindowRatio = WindowRatio { x: 0.5, y: 0.5 };

  pub const fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

impl fmt::Display for WindowRatio {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "({:.2}, {:.2})", self.x, self.y)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
  Left,
  Right,
}

/// Fire-and-forget input into the game window. Implementations bring the window to the
/// foreground themselves.
pub trait InputDevice: Send + Sync {
  fn press_key(&self, key: &str);
  fn hold_key(&self, key: &str);
  fn release_key(&self, key: &str);
  fn write_text(&self, text: &str);
  fn click(&self, at: WindowRatio, button: MouseButton);
}

/// Logs every input instead of sending it.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingInputDevice;

impl InputDevice for TracingInputDevice {
  fn press_key(&self, key: &str) {
    info!("[Input] press {}", key);
  }

  fn hold_key(&self, key: &str) {
    info!("[Input] hold {}", key);
  }

  fn release_key(&self, key: &str) {
    info!("[Input] release {}", key);
  }

  fn write_text(&self, text: &str) {
    info!("[Input] write '{}'", text);
  }

  fn click(&self, at: WindowRatio, button: MouseButton) {
    info!("[Input] {:?} click at {}", button, at);
  }
}
