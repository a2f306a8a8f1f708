//! Hash-routed recipe browsing, independent of any UI.
//!
//! A driver owns one [`ViewState`], feeds it [`Event`]s, carries out the
//! returned [`Command`]s, and draws [`render::screen`] after each step.
//!
//! # States
//!
//! ```text
//! Home ──Index──▶ Index(None) ──letter L──▶ Index(L) ──L again──▶ Index(None)
//!   ▲                                                                   │
//!   └──────── Home ◀──── unknown #id ◀──── #id ──▶ Detail(entry) ◀──────┘
//! ```
//!
//! An empty hash shows the list for the current mode and letter.

mod cache;
mod controller;
mod entries;
pub mod render;
mod state;

pub use controller::{Command, Event};
pub use state::ViewState;
