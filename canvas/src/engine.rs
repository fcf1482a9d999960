//! Engine: one room's canvas, from raw input and socket frames to pixels.
//!
//! DESIGN
//! ======
//! [`EngineCore`] holds every piece of state and never touches the browser;
//! handlers take plain values and return [`Action`]s. [`Engine`] is the
//! `wasm_bindgen` wrapper that owns the 2D context and the room socket and
//! performs those actions through `dispatch`.
//!
//! SEEDING
//! =======
//! A new engine starts in the seeding phase. Pointer-down is ignored and
//! relayed shapes are buffered in arrival order; wheel zoom still works.
//! `finish_seed` loads the fetched list, drops any buffered shapes the list
//! already ends with, appends the rest and goes live. The join frame may
//! reach the server before the history read, so the same shape can arrive
//! both ways. The relay records history and delivers in one order, which
//! makes the overlap a suffix of the seed and a prefix of the buffer.
//!
//! DISPATCH
//! ========
//! Actions run in the order returned. Consecutive `RenderNeeded`s collapse
//! into one repaint. A failed repaint or socket send is logged and dropped;
//! nothing is retried.

use std::cell::RefCell;
use std::rc::Rc;

use frames::{Envelope, Frame, RoomId, Shape};
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, WebSocket};

use crate::camera::{Camera, Point};
use crate::doc::ShapeStore;
use crate::input::{Button, Draft, InputState, Tool};
use crate::net::{self, HttpShapeSource};
use crate::render::{self, Surface};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    RenderNeeded,
    /// Transmit this envelope on the room socket.
    Send(Envelope),
}

/// Whether the initial shape list has arrived yet.
#[derive(Debug)]
enum Phase {
    /// Waiting for the seed. Relayed shapes are held here in arrival order.
    Seeding { pending: Vec<Shape> },
    Live,
}

/// Core engine state: all logic that doesn't depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub store: ShapeStore,
    pub camera: Camera,
    pub tool: Tool,
    pub input: InputState,
    pub viewport_width: f64,
    pub viewport_height: f64,
    room_id: RoomId,
    phase: Phase,
}

impl EngineCore {
    /// A fresh engine for `room_id`, waiting for its seed.
    #[must_use]
    pub fn new(room_id: RoomId) -> Self {
        Self {
            store: ShapeStore::new(),
            camera: Camera::default(),
            tool: Tool::default(),
            input: InputState::default(),
            viewport_width: 0.0,
            viewport_height: 0.0,
            room_id,
            phase: Phase::Seeding { pending: Vec::new() },
        }
    }

    #[must_use]
    pub fn room_id(&self) -> &RoomId {
        &self.room_id
    }

    #[must_use]
    pub fn is_seeding(&self) -> bool {
        matches!(self.phase, Phase::Seeding { .. })
    }

    // --- Data inputs ---

    /// Load the seed list, then replay relayed shapes that arrived meanwhile.
    ///
    /// Buffered shapes the seed already ends with are skipped. Later calls
    /// are ignored; the store is seeded exactly once.
    pub fn finish_seed(&mut self, shapes: Vec<Shape>) -> Vec<Action> {
        let Phase::Seeding { pending } = std::mem::replace(&mut self.phase, Phase::Live) else {
            return Vec::new();
        };
        let overlap = seed_overlap(&shapes, &pending);
        if overlap > 0 {
            log::debug!("{overlap} relayed shapes already in seed");
        }
        self.store.load(shapes);
        for shape in pending.into_iter().skip(overlap) {
            self.store.append(shape);
        }
        vec![Action::RenderNeeded]
    }

    /// Apply one text frame from the room socket.
    ///
    /// Only `chat` frames for this engine's room change anything. Malformed
    /// frames are logged and dropped.
    pub fn apply_remote(&mut self, text: &str) -> Vec<Action> {
        let frame = match frames::decode(text) {
            Ok(frame) => frame,
            Err(err) => {
                log::debug!("dropping relayed frame: {err}");
                return Vec::new();
            }
        };
        let (room_id, shape) = match frame {
            Frame::Chat { room_id, shape, .. } => (room_id, shape),
            Frame::JoinRoom { room_id } | Frame::LeaveRoom { room_id } => {
                log::debug!("ignoring membership frame for room {room_id}");
                return Vec::new();
            }
        };
        if room_id != self.room_id {
            log::debug!("ignoring chat for room {room_id}");
            return Vec::new();
        }
        match &mut self.phase {
            Phase::Seeding { pending } => {
                pending.push(shape);
                Vec::new()
            }
            Phase::Live => {
                self.store.append(shape);
                vec![Action::RenderNeeded]
            }
        }
    }

    /// The `join_room` frame to send once the socket is open.
    #[must_use]
    pub fn join_envelope(&self) -> Envelope {
        Envelope::JoinRoom { room_id: self.room_id.clone() }
    }

    // --- Tool / viewport ---

    /// Set the tool used by the next pointer-down. A gesture in progress keeps its own.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
    }

    /// Update viewport dimensions in CSS pixels.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Vec<Action> {
        self.viewport_width = width;
        self.viewport_height = height;
        vec![Action::RenderNeeded]
    }

    // --- Input events ---

    pub fn on_pointer_down(&mut self, screen_pt: Point, button: Button) -> Vec<Action> {
        if self.is_seeding() || !self.input.is_idle() {
            return Vec::new();
        }
        match button {
            Button::Primary => {
                let world = self.camera.screen_to_world(screen_pt);
                self.input = InputState::Drawing(Draft::begin(self.tool, world));
                vec![Action::RenderNeeded]
            }
            Button::Middle | Button::Secondary => {
                self.input = InputState::Panning { last_screen: screen_pt };
                Vec::new()
            }
        }
    }

    pub fn on_pointer_move(&mut self, screen_pt: Point) -> Vec<Action> {
        let world = self.camera.screen_to_world(screen_pt);
        match &mut self.input {
            InputState::Idle => Vec::new(),
            InputState::Panning { last_screen } => {
                let (dx, dy) = (screen_pt.x - last_screen.x, screen_pt.y - last_screen.y);
                *last_screen = screen_pt;
                self.camera.pan_by(dx, dy);
                vec![Action::RenderNeeded]
            }
            InputState::Drawing(draft) => {
                draft.update(world);
                vec![Action::RenderNeeded]
            }
        }
    }

    pub fn on_pointer_up(&mut self, screen_pt: Point) -> Vec<Action> {
        match std::mem::take(&mut self.input) {
            InputState::Idle | InputState::Panning { .. } => Vec::new(),
            InputState::Drawing(draft) => {
                let shape = draft.finish(self.camera.screen_to_world(screen_pt));
                self.commit(shape)
            }
        }
    }

    /// Zoom about the cursor by a vertical scroll of `delta_y` pixels
    /// (positive = down). Accepted in every input state.
    pub fn on_wheel(&mut self, screen_pt: Point, delta_y: f64) -> Vec<Action> {
        self.camera.zoom_at(screen_pt, delta_y);
        vec![Action::RenderNeeded]
    }

    // --- Queries ---

    /// The shape the current gesture would commit, drawn above the store.
    #[must_use]
    pub fn preview(&self) -> Option<Shape> {
        self.input.draft().map(Draft::shape)
    }

    /// Draw the current state to `surface`.
    ///
    /// # Errors
    ///
    /// Returns the surface's error if a draw call fails.
    pub fn render<S: Surface>(&self, surface: &S) -> Result<(), S::Error> {
        let preview = self.preview();
        render::draw(
            surface,
            &self.store,
            &self.camera,
            preview.as_ref(),
            self.viewport_width,
            self.viewport_height,
        )
    }

    fn commit(&mut self, shape: Shape) -> Vec<Action> {
        let envelope = Envelope::chat(self.room_id.clone(), &shape);
        self.store.append(shape);
        vec![Action::RenderNeeded, Action::Send(envelope)]
    }
}

/// Length of the longest suffix of `seed` that `pending` starts with.
fn seed_overlap(seed: &[Shape], pending: &[Shape]) -> usize {
    (1..=seed.len().min(pending.len()))
        .rev()
        .find(|&n| seed[seed.len() - n..] == pending[..n])
        .unwrap_or(0)
}

struct Inner {
    core: EngineCore,
    ctx: CanvasRenderingContext2d,
    socket: WebSocket,
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas
/// context and the room socket.
///
/// The host page wires DOM and socket events to these methods; everything
/// else (rendering, sending) happens here.
#[wasm_bindgen]
pub struct Engine {
    inner: Rc<RefCell<Inner>>,
}

#[wasm_bindgen]
impl Engine {
    /// Create an engine bound to `canvas` and an already-opening `socket` for `room_id`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the canvas has no 2D context.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: &HtmlCanvasElement, socket: WebSocket, room_id: String) -> Result<Engine, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("canvas has no 2d context"))?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(JsValue::from)?;
        let core = EngineCore::new(RoomId::from(room_id));
        Ok(Self { inner: Rc::new(RefCell::new(Inner { core, ctx, socket })) })
    }

    /// Fetch the room's existing shapes from `api_base` and go live.
    pub fn seed(&self, api_base: String) {
        let inner = Rc::clone(&self.inner);
        let room_id = inner.borrow().core.room_id().clone();
        wasm_bindgen_futures::spawn_local(async move {
            let shapes = net::fetch_seed(&HttpShapeSource::new(api_base), &room_id).await;
            let actions = inner.borrow_mut().core.finish_seed(shapes);
            dispatch(&inner, actions);
        });
    }

    /// Call from the socket's `open` handler.
    pub fn on_socket_open(&self) {
        let join = self.inner.borrow().core.join_envelope();
        dispatch(&self.inner, vec![Action::Send(join)]);
    }

    /// Call from the socket's `message` handler with the frame text.
    pub fn on_socket_message(&self, text: &str) {
        let actions = self.inner.borrow_mut().core.apply_remote(text);
        dispatch(&self.inner, actions);
    }

    /// Switch tools by name. Unknown names are ignored.
    pub fn set_tool(&self, name: &str) {
        match Tool::parse(name) {
            Some(tool) => self.inner.borrow_mut().core.set_tool(tool),
            None => log::warn!("unknown tool {name:?}"),
        }
    }

    pub fn set_viewport(&self, width_css: f64, height_css: f64) {
        let actions = self.inner.borrow_mut().core.set_viewport(width_css, height_css);
        dispatch(&self.inner, actions);
    }

    pub fn on_pointer_down(&self, x: f64, y: f64, button: i16) {
        let Some(button) = Button::from_dom(button) else {
            return;
        };
        let actions = self.inner.borrow_mut().core.on_pointer_down(Point::new(x, y), button);
        dispatch(&self.inner, actions);
    }

    pub fn on_pointer_move(&self, x: f64, y: f64) {
        let actions = self.inner.borrow_mut().core.on_pointer_move(Point::new(x, y));
        dispatch(&self.inner, actions);
    }

    pub fn on_pointer_up(&self, x: f64, y: f64) {
        let actions = self.inner.borrow_mut().core.on_pointer_up(Point::new(x, y));
        dispatch(&self.inner, actions);
    }

    /// Call from the canvas `wheel` handler with the event's `deltaY`.
    pub fn on_wheel(&self, x: f64, y: f64, delta_y: f64) {
        let actions = self.inner.borrow_mut().core.on_wheel(Point::new(x, y), delta_y);
        dispatch(&self.inner, actions);
    }

    /// Draw the current state to the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if any `Canvas2D` call fails.
    pub fn render(&self) -> Result<(), JsValue> {
        let inner = self.inner.borrow();
        inner.core.render(&inner.ctx)
    }
}

/// Perform actions in order. Consecutive redraw requests collapse into one;
/// failures are logged.
fn dispatch(inner: &RefCell<Inner>, actions: Vec<Action>) {
    let inner = inner.borrow();
    let mut rendered = false;
    for action in actions {
        match action {
            Action::RenderNeeded => {
                if rendered {
                    continue;
                }
                rendered = true;
                if let Err(err) = inner.core.render(&inner.ctx) {
                    log::warn!("render failed: {err:?}");
                }
            }
            Action::Send(envelope) => {
                if let Err(err) = inner.socket.send_with_str(&frames::encode(&envelope)) {
                    log::warn!("send failed: {err:?}");
                }
            }
        }
    }
}

/// Install the panic hook and console logger when the module loads.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("logger already installed");
    }
}
