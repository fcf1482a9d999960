//! Canvas drawing engine for shared sketch rooms.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! full lifecycle of one room's canvas: translating raw DOM input into drawn
//! shapes, maintaining camera state for pan/zoom, replaying the room's shape
//! list, and rendering the scene. The host page only wires DOM and socket
//! events to [`engine::Engine`]; committed shapes leave as
//! [`engine::Action::Send`] frames on the room socket.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`doc`] | Ordered store of committed shapes |
//! | [`camera`] | Pan/zoom camera and coordinate conversions |
//! | [`input`] | Tools, buttons, drafts, and the gesture state machine |
//! | [`render`] | Full-scene repaint through the [`render::Surface`] trait |
//! | [`net`] | Seed fetch from the shape history endpoint |
//! | [`consts`] | Shared numeric and style constants |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod input;
pub mod net;
pub mod render;
