//! Gesture spec mini-language
//!
//! A gesture spec is `action[:modifiers[:namespace]]`, where `modifiers` is a
//! hyphen-joined subset of `shift`, `ctrl`, `alt`, `meta` (possibly empty)
//! and `namespace` defaults to the configured one. Parsing canonicalizes the
//! modifier order, so `drag:ctrl-shift:amv` and `drag:shift-ctrl:amv` name
//! the same gesture.

use std::fmt;

use super::ModifierKeys;
use crate::error::{ViewerError, ViewerResult};

/// High-level action a gesture is derived from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureAction {
    /// Pointer moved, payload is the absolute position
    Move,
    /// Pointer moved with a button held, payload is the delta
    Drag,
    /// Wheel turned, payload is the (scaled) wheel delta
    Wheel,
    /// Key pressed, payload is the key code
    Key,
    /// Left button pressed
    Left,
    /// Right button pressed
    Right,
    /// Middle button pressed
    Middle,
}

/// Low-level input signal a gesture listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    PointerMove,
    ButtonDown,
    ButtonUp,
    Wheel,
    KeyPress,
}

/// Action names accepted in specs, resolved at bind time
const ACTIONS: &[(&str, GestureAction)] = &[
    ("move", GestureAction::Move),
    ("drag", GestureAction::Drag),
    ("wheel", GestureAction::Wheel),
    ("key", GestureAction::Key),
    ("left", GestureAction::Left),
    ("right", GestureAction::Right),
    ("middle", GestureAction::Middle),
];

impl GestureAction {
    pub fn from_name(name: &str) -> Option<Self> {
        ACTIONS
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, action)| *action)
    }

    pub fn name(&self) -> &'static str {
        ACTIONS
            .iter()
            .find(|(_, action)| action == self)
            .map(|(n, _)| *n)
            .unwrap_or("?")
    }

    /// Low-level signals this action is derived from
    pub fn signals(&self) -> &'static [Signal] {
        match self {
            GestureAction::Move => &[Signal::PointerMove],
            GestureAction::Drag => &[Signal::PointerMove, Signal::ButtonDown, Signal::ButtonUp],
            GestureAction::Wheel => &[Signal::Wheel],
            GestureAction::Key => &[Signal::KeyPress],
            // The release is tracked so a later drag binding sees no held button
            GestureAction::Left | GestureAction::Right | GestureAction::Middle => {
                &[Signal::ButtonDown, Signal::ButtonUp]
            }
        }
    }
}

/// Parsed, canonical gesture spec
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GestureSpec {
    pub action: GestureAction,
    pub modifiers: ModifierKeys,
    pub namespace: String,
}

impl GestureSpec {
    pub fn new(action: GestureAction, modifiers: ModifierKeys, namespace: impl Into<String>) -> Self {
        Self {
            action,
            modifiers,
            namespace: namespace.into(),
        }
    }

    /// Parse `spec`, using `default_namespace` when it names none
    pub fn parse(spec: &str, default_namespace: &str) -> ViewerResult<Self> {
        let mut parts = spec.split(':');
        let action_name = parts.next().unwrap_or_default();
        let modifier_names = parts.next().unwrap_or_default();
        let namespace = parts.next().unwrap_or(default_namespace);
        if parts.next().is_some() {
            return Err(ViewerError::invalid_gesture(spec, "too many ':' separated parts"));
        }

        let action = GestureAction::from_name(action_name).ok_or_else(|| {
            ViewerError::invalid_gesture(spec, format!("unknown action {action_name:?}"))
        })?;

        let mut modifiers = ModifierKeys::NONE;
        for name in modifier_names.split('-').filter(|n| !n.is_empty()) {
            if !modifiers.set_by_name(name) {
                return Err(ViewerError::invalid_gesture(
                    spec,
                    format!("unknown modifier {name:?}"),
                ));
            }
        }

        Ok(Self::new(action, modifiers, namespace))
    }

    /// Canonical `action:modifiers:namespace` name
    pub fn name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GestureSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.action.name(), self.modifiers, self.namespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_spec() {
        let spec = GestureSpec::parse("drag:shift:amv", "x").unwrap();
        assert_eq!(spec.action, GestureAction::Drag);
        assert_eq!(spec.modifiers, ModifierKeys::SHIFT);
        assert_eq!(spec.namespace, "amv");
    }

    #[test]
    fn modifier_order_is_canonicalized() {
        let a = GestureSpec::parse("wheel:meta-shift-ctrl:amv", "amv").unwrap();
        let b = GestureSpec::parse("wheel:shift-ctrl-meta:amv", "amv").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.name(), "wheel:shift-ctrl-meta:amv");
    }

    #[test]
    fn missing_parts_take_defaults() {
        let spec = GestureSpec::parse("key", "amv").unwrap();
        assert_eq!(spec.name(), "key::amv");
        let spec = GestureSpec::parse("left:alt", "amv").unwrap();
        assert_eq!(spec.name(), "left:alt:amv");
    }

    #[test]
    fn unknown_action_fails() {
        let err = GestureSpec::parse("spin:shift:amv", "amv").unwrap_err();
        assert!(err.to_string().contains("unknown action"));
    }

    #[test]
    fn unknown_modifier_fails() {
        assert!(GestureSpec::parse("drag:hyper:amv", "amv").is_err());
        assert!(GestureSpec::parse("drag::amv:extra", "amv").is_err());
    }

    #[test]
    fn drag_needs_button_signals() {
        assert_eq!(
            GestureAction::Drag.signals(),
            &[Signal::PointerMove, Signal::ButtonDown, Signal::ButtonUp]
        );
    }
}
