//! Map widget
//!
//! Hosts one map: the object set, the gesture dispatcher of its element, the
//! viewer (built once a render backend is attached) and the default
//! manipulators. Anything that needs the viewer before it exists is queued on
//! the widget's [`Readiness`].

use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;

use crate::config::ManipulatorConfig;
use crate::controls::{
    bind_control, default_bindings, Control, ControlKind, HoverControl, HoverPicker,
};
use crate::error::{ViewerError, ViewerResult};
use crate::gesture::{GestureDispatcher, ListenerId, RawInput};
use crate::plot_data::PlotData;
use crate::ready::Readiness;
use crate::render::{Frame, RenderBackend};
use crate::scene::ObjectSet;
use crate::snapshot::{self, ViewerStateSnapshot};
use crate::viewer::{Dimensionality, Viewer, Viewport2d};

pub type ViewerHandle = Rc<RefCell<Viewer>>;
type SharedBackend = Rc<RefCell<Option<Box<dyn RenderBackend>>>>;

pub struct MapWidget {
    config: ManipulatorConfig,
    dimensionality: Dimensionality,
    objects: Rc<RefCell<ObjectSet>>,
    viewport_hint: Option<Viewport2d>,
    drawing_order: Vec<usize>,
    canvas_size: DVec2,
    dispatcher: Rc<RefCell<GestureDispatcher>>,
    hover: Rc<RefCell<HoverPicker>>,
    backend: SharedBackend,
    viewer: Readiness<ViewerHandle>,
    listeners: Rc<RefCell<Vec<ListenerId>>>,
    manipulators_requested: bool,
}

impl MapWidget {
    pub fn new(
        config: ManipulatorConfig,
        dimensionality: Dimensionality,
        objects: ObjectSet,
        canvas_size: DVec2,
    ) -> Self {
        let drawing_order = (0..objects.len()).collect();
        let dispatcher = GestureDispatcher::new(&config);
        Self {
            config,
            dimensionality,
            objects: Rc::new(RefCell::new(objects)),
            viewport_hint: None,
            drawing_order,
            canvas_size,
            dispatcher: Rc::new(RefCell::new(dispatcher)),
            hover: Rc::new(RefCell::new(HoverPicker::new())),
            backend: Rc::new(RefCell::new(None)),
            viewer: Readiness::new(),
            listeners: Rc::new(RefCell::new(Vec::new())),
            manipulators_requested: false,
        }
    }

    /// Create a widget for a plot, using its viewport hint and drawing order
    pub fn from_plot_data(
        config: ManipulatorConfig,
        plot: &PlotData,
        canvas_size: DVec2,
    ) -> ViewerResult<Self> {
        let objects = ObjectSet::from_plot_data(plot)?;
        let mut widget = Self::new(config, plot.dimensionality()?, objects, canvas_size);
        widget.viewport_hint = plot.viewport();
        if plot.drawing_order.is_some() {
            widget.drawing_order = plot.drawing_order();
        }
        Ok(widget)
    }

    pub fn config(&self) -> &ManipulatorConfig {
        &self.config
    }

    pub fn dimensionality(&self) -> Dimensionality {
        self.dimensionality
    }

    pub fn objects(&self) -> Rc<RefCell<ObjectSet>> {
        Rc::clone(&self.objects)
    }

    pub fn dispatcher(&self) -> Rc<RefCell<GestureDispatcher>> {
        Rc::clone(&self.dispatcher)
    }

    /// The viewer, once a backend has been attached
    pub fn viewer(&self) -> Option<ViewerHandle> {
        self.viewer.get()
    }

    /// Run `f` with the viewer now, or as soon as it exists
    pub fn when_ready<F>(&self, f: F)
    where
        F: FnOnce(ViewerHandle) + 'static,
    {
        self.viewer.when_ready(f);
    }

    /// Attach the rasterizer; this builds and initializes the viewer
    pub fn attach_backend(&mut self, backend: Box<dyn RenderBackend>) {
        *self.backend.borrow_mut() = Some(backend);
        if self.viewer.is_ready() {
            return;
        }
        self.build_viewer();
    }

    fn build_viewer(&mut self) {
        let viewport = match self.dimensionality {
            Dimensionality::Two => self.viewport_hint,
            Dimensionality::Three => None,
        };
        let mut viewer = Viewer::new(
            self.dimensionality,
            &self.config,
            Rc::clone(&self.objects),
            viewport,
        );
        viewer.initialize(self.canvas_size);
        self.viewer.resolve(Rc::new(RefCell::new(viewer)));
    }

    /// Bind the default manipulators for the widget's dimensionality. Done
    /// once the viewer exists; later calls are ignored.
    pub fn bind_manipulators(&mut self) {
        if self.manipulators_requested {
            log::debug!("Manipulators already requested");
            return;
        }
        self.manipulators_requested = true;
        self.queue_manipulators();
    }

    fn queue_manipulators(&self) {
        let dispatcher = Rc::clone(&self.dispatcher);
        let hover = Rc::clone(&self.hover);
        let backend = Rc::clone(&self.backend);
        let listeners = Rc::clone(&self.listeners);
        let config = self.config.clone();
        self.viewer.when_ready(move |viewer| {
            let dimensionality = viewer.borrow().dimensionality();
            let mut dispatcher = dispatcher.borrow_mut();
            for (spec, kind) in default_bindings(dimensionality) {
                let control: Box<dyn Control> = match kind {
                    ControlKind::Hover => {
                        let raycaster = backend.borrow().as_ref().map(|b| b.raycaster());
                        let control = match raycaster {
                            Some(raycaster) => HoverControl::with_raycaster(
                                Rc::downgrade(&viewer),
                                Rc::clone(&hover),
                                raycaster,
                            ),
                            None => HoverControl::new(Rc::downgrade(&viewer), Rc::clone(&hover)),
                        };
                        Box::new(control)
                    }
                    _ => match kind.build(&viewer, &config, &hover) {
                        Some(control) => control,
                        None => continue,
                    },
                };
                match bind_control(&mut dispatcher, spec, control) {
                    Ok(id) => listeners.borrow_mut().push(id),
                    Err(err) => log::error!("Failed to bind {kind:?} to {spec}: {err}"),
                }
            }
            log::info!("Bound {} manipulators for {dimensionality} map", listeners.borrow().len());
        });
    }

    fn unbind_manipulators(&mut self) {
        let mut dispatcher = self.dispatcher.borrow_mut();
        for id in self.listeners.borrow_mut().drain(..) {
            dispatcher.unbind(id);
        }
        self.hover.borrow_mut().reset();
    }

    /// Feed raw input of the widget's element
    pub fn handle_input(&self, input: RawInput) -> usize {
        self.dispatcher.borrow_mut().handle(input)
    }

    /// Subscribe to hover changes
    pub fn on_hover_changed<F>(&self, callback: F)
    where
        F: FnMut(&[usize]) + 'static,
    {
        self.hover.borrow_mut().on_hover_changed(callback);
    }

    pub fn hovered(&self) -> Vec<usize> {
        self.hover.borrow().hovered().to_vec()
    }

    pub fn resize(&mut self, canvas_size: DVec2) {
        self.canvas_size = canvas_size;
        if let Some(viewer) = self.viewer.get() {
            let mut viewer = viewer.borrow_mut();
            viewer.set_canvas_size(canvas_size);
            viewer.camera_update();
        }
    }

    /// Current viewer state
    pub fn snapshot(&self) -> ViewerResult<ViewerStateSnapshot> {
        let viewer = self.viewer.get().ok_or(ViewerError::NotReady)?;
        let viewer = viewer.borrow();
        Ok(snapshot::snapshot(&viewer))
    }

    /// Restore a snapshot.
    ///
    /// A snapshot of another dimensionality re-initializes the widget first;
    /// the state is applied once the new viewer is ready. Only an
    /// unsupported dimensionality fails here, later failures are logged.
    pub fn restore(&mut self, snapshot: ViewerStateSnapshot) -> ViewerResult<()> {
        let dimensionality = snapshot.dimensionality()?;
        if dimensionality != self.dimensionality {
            self.reinitialize(dimensionality);
        }
        self.viewer.when_ready(move |viewer| {
            if let Err(err) = snapshot::restore(&mut viewer.borrow_mut(), &snapshot) {
                log::error!("Failed to restore viewer state: {err}");
            }
        });
        Ok(())
    }

    fn reinitialize(&mut self, dimensionality: Dimensionality) {
        log::info!(
            "Re-initializing map widget from {} to {dimensionality}",
            self.dimensionality
        );
        self.unbind_manipulators();
        self.dimensionality = dimensionality;
        self.viewport_hint = None;
        // No viewer yet: everything queued, manipulators included, runs on
        // the viewer built once a backend is attached.
        if !self.viewer.is_ready() {
            return;
        }
        self.viewer = Readiness::new();
        if self.backend.borrow().is_some() {
            self.build_viewer();
        }
        if self.manipulators_requested {
            self.queue_manipulators();
        }
    }

    /// Draw one frame with the attached backend. Returns false while there
    /// is nothing to draw.
    pub fn render_frame(&self) -> bool {
        let Some(viewer) = self.viewer.get() else {
            return false;
        };
        let mut backend = self.backend.borrow_mut();
        let Some(backend) = backend.as_mut() else {
            return false;
        };
        let viewer = viewer.borrow();
        let objects = viewer.objects();
        let drawing_order: Vec<usize> = if self.drawing_order.len() == objects.len() {
            self.drawing_order.clone()
        } else {
            (0..objects.len()).collect()
        };
        backend.draw_frame(&Frame {
            camera: viewer.uniform_data(),
            objects: &objects,
            drawing_order: &drawing_order,
            generation: objects.generation(),
        });
        true
    }
}
