//! Ward chat — hospital assistant chat widget.
//!
//! DESIGN
//! ======
//! The widget core is split the same way the UI is: `widget` owns the
//! conversation state and the reducer that mutates it, `transport` performs
//! the single POST per turn, and `render` turns a state snapshot into panel
//! lines. `config` resolves the backend endpoint once at start-up.

pub mod config;
pub mod render;
pub mod transport;
pub mod widget;
