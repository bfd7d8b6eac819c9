//! Browser binding
//!
//! Attaches DOM listeners to a canvas as the gesture dispatcher asks for
//! them, converts DOM events to [`RawInput`], and drives the render loop
//! with `requestAnimationFrame`.

use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Event, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent};

use crate::config::ManipulatorConfig;
use crate::gesture::{ModifierKeys, MouseButton, RawInput, Signal};
use crate::plot_data::PlotData;
use crate::render::RenderBackend;
use crate::snapshot::ViewerStateSnapshot;
use crate::widget::MapWidget;

pub type SharedWidget = Rc<RefCell<MapWidget>>;

fn mouse_modifiers(event: &MouseEvent) -> ModifierKeys {
    ModifierKeys::new(
        event.shift_key(),
        event.ctrl_key(),
        event.alt_key(),
        event.meta_key(),
    )
}

fn key_modifiers(event: &KeyboardEvent) -> ModifierKeys {
    ModifierKeys::new(
        event.shift_key(),
        event.ctrl_key(),
        event.alt_key(),
        event.meta_key(),
    )
}

fn mouse_position(event: &MouseEvent) -> DVec2 {
    DVec2::new(f64::from(event.offset_x()), f64::from(event.offset_y()))
}

/// Convert a DOM event delivered for `signal`
pub fn raw_input(signal: Signal, event: &Event) -> Option<RawInput> {
    match signal {
        Signal::PointerMove => {
            let event = event.dyn_ref::<MouseEvent>()?;
            Some(RawInput::PointerMove {
                position: mouse_position(event),
                modifiers: mouse_modifiers(event),
            })
        }
        Signal::ButtonDown | Signal::ButtonUp => {
            let event = event.dyn_ref::<MouseEvent>()?;
            let position = mouse_position(event);
            let button = MouseButton::from_dom(event.button());
            let modifiers = mouse_modifiers(event);
            Some(if signal == Signal::ButtonDown {
                RawInput::ButtonDown {
                    position,
                    button,
                    modifiers,
                }
            } else {
                RawInput::ButtonUp {
                    position,
                    button,
                    modifiers,
                }
            })
        }
        Signal::Wheel => {
            let event = event.dyn_ref::<WheelEvent>()?;
            event.prevent_default();
            Some(RawInput::Wheel {
                delta: DVec2::new(event.delta_x(), event.delta_y()),
                modifiers: mouse_modifiers(event),
            })
        }
        Signal::KeyPress => {
            let event = event.dyn_ref::<KeyboardEvent>()?;
            let key_code = match event.char_code() {
                0 => event.key_code(),
                code => code,
            };
            Some(RawInput::KeyPress {
                key_code,
                modifiers: key_modifiers(event),
            })
        }
    }
}

fn dom_event_name(signal: Signal) -> &'static str {
    match signal {
        Signal::PointerMove => "mousemove",
        Signal::ButtonDown => "mousedown",
        Signal::ButtonUp => "mouseup",
        Signal::Wheel => "wheel",
        Signal::KeyPress => "keypress",
    }
}

/// Route the widget's low-level signals from `canvas`. DOM listeners are
/// added once per signal, when the first gesture needing it is bound.
pub fn attach_input(widget: &SharedWidget, canvas: &HtmlCanvasElement) {
    // keypress is only delivered to focusable elements
    if let Err(err) = canvas.set_attribute("tabindex", "0") {
        log::warn!("Canvas is not focusable, key gestures disabled: {err:?}");
    }

    let dispatcher = widget.borrow().dispatcher();
    let target = canvas.clone();
    let weak = Rc::downgrade(widget);
    dispatcher.borrow_mut().set_signal_hook(move |signal| {
        let weak = weak.clone();
        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let Some(widget) = weak.upgrade() else {
                return;
            };
            if let Some(input) = raw_input(signal, &event) {
                widget.borrow().handle_input(input);
            }
        });
        let name = dom_event_name(signal);
        match target.add_event_listener_with_callback(name, listener.as_ref().unchecked_ref()) {
            Ok(()) => log::debug!("Listening to {name}"),
            Err(err) => log::error!("Failed to listen to {name}: {err:?}"),
        }
        // Listeners live as long as the canvas
        listener.forget();
    });
}

/// Self-rescheduling per-frame callback drawing the widget
pub fn start_render_loop(widget: &SharedWidget) {
    let holder: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let holder_for_cb = Rc::clone(&holder);
    let weak = Rc::downgrade(widget);

    *holder.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |_timestamp: f64| {
        let Some(widget) = weak.upgrade() else {
            // Widget gone, break the closure's self reference
            holder_for_cb.borrow_mut().take();
            return;
        };
        widget.borrow().render_frame();
        request_frame(&holder_for_cb);
    }));
    request_frame(&holder);
}

fn request_frame(holder: &Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>) {
    let Some(window) = web_sys::window() else {
        log::error!("No global window, render loop stopped");
        return;
    };
    let holder = holder.borrow();
    let Some(callback) = holder.as_ref() else {
        return;
    };
    let function: &js_sys::Function = callback.as_ref().unchecked_ref();
    if let Err(err) = window.request_animation_frame(function) {
        log::error!("requestAnimationFrame failed: {err:?}");
    }
}

fn canvas_size(canvas: &HtmlCanvasElement) -> DVec2 {
    DVec2::new(
        f64::from(canvas.client_width().max(1)),
        f64::from(canvas.client_height().max(1)),
    )
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Map viewer bound to a page canvas
#[wasm_bindgen]
pub struct WebMapViewer {
    widget: SharedWidget,
}

#[wasm_bindgen]
impl WebMapViewer {
    /// Create a viewer for the canvas with id `canvas_id` showing the plot
    /// given as JSON. `config_json` may be empty for the default manipulator
    /// configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(canvas_id: &str, plot_json: &str, config_json: &str) -> Result<WebMapViewer, JsValue> {
        let config = if config_json.trim().is_empty() {
            ManipulatorConfig::default()
        } else {
            ManipulatorConfig::from_json(config_json).map_err(js_error)?
        };
        let plot = PlotData::from_json(plot_json).map_err(js_error)?;

        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("no element with id {canvas_id:?}")))?
            .dyn_into()
            .map_err(|_| JsValue::from_str(&format!("{canvas_id:?} is not a canvas")))?;

        let widget = MapWidget::from_plot_data(config, &plot, canvas_size(&canvas))
            .map_err(js_error)?;
        let widget = Rc::new(RefCell::new(widget));
        attach_input(&widget, &canvas);
        widget.borrow_mut().bind_manipulators();
        Ok(WebMapViewer { widget })
    }

    /// Current view as JSON
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        self.widget
            .borrow()
            .snapshot()
            .and_then(|snapshot| snapshot.to_json())
            .map_err(js_error)
    }

    /// Restore a view saved with [`snapshot_json`](Self::snapshot_json)
    pub fn restore_json(&self, json: &str) -> Result<(), JsValue> {
        let snapshot = ViewerStateSnapshot::from_json(json).map_err(js_error)?;
        self.widget.borrow_mut().restore(snapshot).map_err(js_error)
    }

    pub fn resize(&self, width: f64, height: f64) {
        self.widget.borrow_mut().resize(DVec2::new(width, height));
    }

    pub fn start(&self) {
        start_render_loop(&self.widget);
    }
}

impl WebMapViewer {
    /// Attach the rasterizer; the viewer is built at this point
    pub fn attach_backend(&self, backend: Box<dyn RenderBackend>) {
        self.widget.borrow_mut().attach_backend(backend);
    }

    pub fn widget(&self) -> SharedWidget {
        Rc::clone(&self.widget)
    }
}

#[wasm_bindgen(start)]
pub fn start() {
    crate::init_web_logging();
}
