//! Per-element gesture dispatcher
//!
//! Raw pointer, wheel and key input is fed in through [`GestureDispatcher::handle`]
//! and re-emitted, synchronously, as named gestures to every listener whose
//! spec matches the action and the exact modifier state.

use std::collections::BTreeSet;

use glam::DVec2;

use super::{GestureAction, GestureSpec, ModifierKeys, Signal};
use crate::config::ManipulatorConfig;
use crate::error::ViewerResult;

/// Mouse button of a press / release
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u16),
}

impl MouseButton {
    /// Map a DOM `MouseEvent.button` value
    pub fn from_dom(button: i16) -> Self {
        match button {
            0 => MouseButton::Left,
            1 => MouseButton::Middle,
            2 => MouseButton::Right,
            other => MouseButton::Other(other.max(0) as u16),
        }
    }

    fn bit(&self) -> u32 {
        match self {
            MouseButton::Left => 1,
            MouseButton::Middle => 2,
            MouseButton::Right => 4,
            MouseButton::Other(n) => 1u32.checked_shl(3 + u32::from(*n)).unwrap_or(1 << 31),
        }
    }
}

/// Platform-independent raw input event
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawInput {
    PointerMove {
        position: DVec2,
        modifiers: ModifierKeys,
    },
    ButtonDown {
        position: DVec2,
        button: MouseButton,
        modifiers: ModifierKeys,
    },
    ButtonUp {
        position: DVec2,
        button: MouseButton,
        modifiers: ModifierKeys,
    },
    Wheel {
        delta: DVec2,
        modifiers: ModifierKeys,
    },
    KeyPress {
        key_code: u32,
        modifiers: ModifierKeys,
    },
}

impl RawInput {
    pub fn signal(&self) -> Signal {
        match self {
            RawInput::PointerMove { .. } => Signal::PointerMove,
            RawInput::ButtonDown { .. } => Signal::ButtonDown,
            RawInput::ButtonUp { .. } => Signal::ButtonUp,
            RawInput::Wheel { .. } => Signal::Wheel,
            RawInput::KeyPress { .. } => Signal::KeyPress,
        }
    }
}

/// Payload delivered with a gesture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GesturePayload {
    /// Absolute pointer position in canvas pixels
    Position(DVec2),
    /// Pointer delta in pixels since the previous drag sample
    Delta(DVec2),
    /// Wheel delta, Y already scaled by the wheel sensitivity
    Wheel(DVec2),
    /// Key code of the pressed key
    Key(u32),
}

/// Handle returned by [`GestureDispatcher::bind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

pub type GestureHandler = Box<dyn FnMut(&GesturePayload)>;

struct Listener {
    id: ListenerId,
    spec: GestureSpec,
    handler: GestureHandler,
}

/// Turns raw input of one element into named gestures
pub struct GestureDispatcher {
    namespace: String,
    wheel_sensitivity: f64,
    signals: BTreeSet<Signal>,
    on_signal_registered: Option<Box<dyn FnMut(Signal)>>,
    listeners: Vec<Listener>,
    next_id: u64,
    buttons_held: u32,
    last_drag_position: Option<DVec2>,
}

impl GestureDispatcher {
    pub fn new(config: &ManipulatorConfig) -> Self {
        Self {
            namespace: config.namespace.clone(),
            wheel_sensitivity: config.wheel_sensitivity,
            signals: BTreeSet::new(),
            on_signal_registered: None,
            listeners: Vec::new(),
            next_id: 0,
            buttons_held: 0,
            last_drag_position: None,
        }
    }

    /// Install a hook called once for every low-level signal that becomes
    /// needed. Signals registered before the hook are replayed to it.
    pub fn set_signal_hook<F>(&mut self, mut hook: F)
    where
        F: FnMut(Signal) + 'static,
    {
        for signal in &self.signals {
            hook(*signal);
        }
        self.on_signal_registered = Some(Box::new(hook));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Canonical names of all bound gestures, in binding order
    pub fn gesture_names(&self) -> Vec<String> {
        self.listeners.iter().map(|l| l.spec.name()).collect()
    }

    /// Bind `handler` to the gesture described by `spec`.
    ///
    /// Fails if the spec names an unknown action or modifier.
    pub fn bind<F>(&mut self, spec: &str, handler: F) -> ViewerResult<ListenerId>
    where
        F: FnMut(&GesturePayload) + 'static,
    {
        let spec = GestureSpec::parse(spec, &self.namespace)?;
        Ok(self.bind_spec(spec, Box::new(handler)))
    }

    /// Bind an already parsed spec
    pub fn bind_spec(&mut self, spec: GestureSpec, handler: GestureHandler) -> ListenerId {
        for signal in spec.action.signals() {
            if self.signals.insert(*signal) {
                log::debug!("Registering low-level signal {signal:?}");
                if let Some(hook) = self.on_signal_registered.as_mut() {
                    hook(*signal);
                }
            }
        }

        let id = ListenerId(self.next_id);
        self.next_id += 1;
        log::debug!("Binding gesture {spec} as {id:?}");
        self.listeners.push(Listener { id, spec, handler });
        id
    }

    /// Remove a listener, dropping its handler. Returns false if unknown.
    pub fn unbind(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        before != self.listeners.len()
    }

    /// Whether any mouse button is currently held
    pub fn is_dragging(&self) -> bool {
        self.buttons_held != 0
    }

    /// Feed one raw input event. Returns how many listeners were invoked.
    pub fn handle(&mut self, input: RawInput) -> usize {
        if !self.signals.contains(&input.signal()) {
            return 0;
        }

        match input {
            RawInput::PointerMove {
                position,
                modifiers,
            } => {
                let mut fired =
                    self.emit(GestureAction::Move, modifiers, |_| GesturePayload::Position(position));
                if self.is_dragging() {
                    if let Some(previous) = self.last_drag_position {
                        let delta = position - previous;
                        fired += self.emit(GestureAction::Drag, modifiers, |_| {
                            GesturePayload::Delta(delta)
                        });
                    }
                    self.last_drag_position = Some(position);
                }
                fired
            }
            RawInput::ButtonDown {
                position,
                button,
                modifiers,
            } => {
                self.buttons_held |= button.bit();
                self.last_drag_position = Some(position);
                let action = match button {
                    MouseButton::Left => GestureAction::Left,
                    MouseButton::Middle => GestureAction::Middle,
                    MouseButton::Right => GestureAction::Right,
                    MouseButton::Other(_) => return 0,
                };
                self.emit(action, modifiers, |_| GesturePayload::Position(position))
            }
            RawInput::ButtonUp { button, .. } => {
                self.buttons_held &= !button.bit();
                self.last_drag_position = None;
                0
            }
            RawInput::Wheel { delta, modifiers } => {
                let sensitivity = self.wheel_sensitivity;
                self.emit(GestureAction::Wheel, modifiers, |spec| {
                    GesturePayload::Wheel(wheel_delta(delta, spec.modifiers.shift, sensitivity))
                })
            }
            RawInput::KeyPress {
                key_code,
                modifiers,
            } => self.emit(GestureAction::Key, modifiers, |_| GesturePayload::Key(key_code)),
        }
    }

    fn emit<P>(&mut self, action: GestureAction, modifiers: ModifierKeys, payload: P) -> usize
    where
        P: Fn(&GestureSpec) -> GesturePayload,
    {
        let mut fired = 0;
        for listener in self
            .listeners
            .iter_mut()
            .filter(|l| l.spec.action == action && l.spec.modifiers == modifiers)
        {
            let payload = payload(&listener.spec);
            (listener.handler)(&payload);
            fired += 1;
        }
        fired
    }
}

/// Wheel delta as seen by a binding. Some devices report a shift-wheel as
/// a pure X delta; for shift bindings that case is swapped back onto Y.
pub fn wheel_delta(raw: DVec2, shift_binding: bool, sensitivity: f64) -> DVec2 {
    let mut delta = raw;
    if shift_binding && delta.y == 0.0 && delta.x != 0.0 {
        delta = DVec2::new(delta.y, delta.x);
    }
    DVec2::new(delta.x, delta.y * sensitivity)
}
