//! The reasoning core: session state, the single-flight tick gate, and
//! the controller that owns the scheduling loop.

pub mod controller;
pub mod gate;
pub mod state;

pub use controller::{EngineController, SensorHandle, FOLLOW_UP_DELAY, TICK_INTERVAL};
pub use state::{EngineState, Label, Mode, SessionState};
