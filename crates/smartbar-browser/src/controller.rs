//! `BrowserSmartBar`: the engine wired to a live contenteditable bar.
//!
//! The engine sits in a `RefCell` shared by every listener, timer and
//! observer callback. Each callback borrows it for one engine call only;
//! messages for the owner are delivered after the borrow is released, so the
//! owner may call back in (`set_target_caret`) from inside its handler.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use gloo_events::{EventListener, EventListenerOptions};
use gloo_timers::callback::Timeout;
use smartbar_core::{
    BeforeInputResult, CaretSync, KeydownResult, LogicalOffset, MachineState, NavigationTrigger,
    OwnerMessage, SurfaceMutation, SyncConfig, TimerToken,
};
use wasm_bindgen::JsCast;
use web_sys::{Element, EventTarget};

use crate::dom::DomSurface;
use crate::events;
use crate::observer::SurfaceObserver;
use crate::timer::BrowserTimer;

pub const DEFAULT_SURFACE_ID: &str = "awesomebar";
pub const DEFAULT_DECORATION_ATTRIBUTE: &str = "data-completionlen";
pub const DEFAULT_ACTIVATION_RETRY: Duration = Duration::from_millis(50);

/// Browser host configuration.
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    /// Element id of the contenteditable bar.
    pub surface_id: String,
    /// Attribute carrying a decoration's logical discount.
    pub decoration_attribute: String,
    /// Poll interval while waiting for the owner to render the bar.
    pub activation_retry: Duration,
    pub sync: SyncConfig,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            surface_id: DEFAULT_SURFACE_ID.to_string(),
            decoration_attribute: DEFAULT_DECORATION_ATTRIBUTE.to_string(),
            activation_retry: DEFAULT_ACTIVATION_RETRY,
            sync: SyncConfig::default(),
        }
    }
}

type Engine = CaretSync<DomSurface, BrowserTimer>;

struct Inner {
    engine: RefCell<Engine>,
    activation_retry: Duration,
    sink: Box<dyn Fn(OwnerMessage)>,
    delivering: Cell<bool>,
    listeners: RefCell<Vec<EventListener>>,
    observer: RefCell<Option<SurfaceObserver>>,
    retry: RefCell<Option<Timeout>>,
}

/// A smart bar hosted in the page.
///
/// Outbound messages go to the sink passed to [`BrowserSmartBar::new`].
pub struct BrowserSmartBar {
    inner: Rc<Inner>,
}

impl BrowserSmartBar {
    pub fn new(config: BrowserConfig, sink: impl Fn(OwnerMessage) + 'static) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<Inner>| {
            let weak = weak.clone();
            let timer = BrowserTimer::new(move |token| {
                if let Some(inner) = weak.upgrade() {
                    inner.timer_fired(token);
                }
            });
            let surface = DomSurface::new(config.surface_id, config.decoration_attribute);
            Inner {
                engine: RefCell::new(CaretSync::new(surface, timer, config.sync)),
                activation_retry: config.activation_retry,
                sink: Box::new(sink),
                delivering: Cell::new(false),
                listeners: RefCell::new(Vec::new()),
                observer: RefCell::new(None),
                retry: RefCell::new(None),
            }
        });
        Self { inner }
    }

    /// Attach to the bar, retrying until the owner has rendered it.
    pub fn activate(&self) {
        self.inner.activate();
    }

    /// Like [`activate`](Self::activate), for a different element id.
    pub fn activate_id(&self, surface_id: impl Into<String>) {
        self.inner
            .engine
            .borrow_mut()
            .surface_mut()
            .set_surface_id(surface_id);
        self.inner.activate();
    }

    /// Attach to a given element instead of looking the configured id up.
    pub fn activate_element(&self, element: Element) {
        self.inner.cancel_retry();
        self.inner.engine.borrow_mut().surface_mut().attach_to(element);
        self.inner.start_session();
    }

    pub fn deactivate(&self) {
        self.inner.deactivate();
    }

    pub fn set_target_caret(&self, offset: LogicalOffset) {
        self.inner.with_engine(|engine| engine.set_target_caret(offset));
    }

    /// Machine state, or None when not active.
    pub fn state(&self) -> Option<MachineState> {
        self.inner.engine.borrow().state()
    }

    pub fn is_waiting_for_surface(&self) -> bool {
        self.inner.retry.borrow().is_some()
    }
}

impl Inner {
    /// Run one engine call, then deliver whatever it queued for the owner.
    fn with_engine<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        let result = f(&mut self.engine.borrow_mut());
        self.flush();
        result
    }

    fn flush(&self) {
        // A sink that calls back into us lands here while we're delivering;
        // the outer loop picks its messages up.
        if self.delivering.replace(true) {
            return;
        }
        loop {
            let next = self.engine.borrow_mut().pop_message();
            let Some(message) = next else { break };
            (self.sink)(message);
        }
        self.delivering.set(false);
    }

    fn activate(self: &Rc<Self>) {
        self.cancel_retry();
        let attached = self.engine.borrow_mut().surface_mut().attach();
        if !attached {
            tracing::debug!(
                target: "smartbar::dom",
                surface_id = %self.engine.borrow().surface().surface_id(),
                "surface not rendered yet, retrying"
            );
            let weak = Rc::downgrade(self);
            let millis = u32::try_from(self.activation_retry.as_millis()).unwrap_or(u32::MAX);
            let timeout = Timeout::new(millis, move || {
                if let Some(inner) = weak.upgrade() {
                    // This timeout is the one running; forget rather than drop it.
                    if let Some(running) = inner.retry.borrow_mut().take() {
                        let _ = running.forget();
                    }
                    inner.activate();
                }
            });
            *self.retry.borrow_mut() = Some(timeout);
            return;
        }
        self.start_session();
    }

    fn start_session(self: &Rc<Self>) {
        let element = self.engine.borrow().surface().element().cloned();
        let Some(element) = element else {
            return;
        };
        self.stop_observing();
        self.detach_listeners();
        self.attach_listeners(&element);
        self.start_observing(&element);
        self.with_engine(|engine| engine.activate());

        let focused = self.engine.borrow().surface().focus();
        if let Err(error) = focused {
            tracing::warn!(target: "smartbar::dom", %error, "could not focus surface");
        }
    }

    fn deactivate(&self) {
        self.cancel_retry();
        self.detach_listeners();
        self.stop_observing();
        self.with_engine(|engine| {
            engine.deactivate();
            engine.surface_mut().detach();
        });
    }

    fn cancel_retry(&self) {
        self.retry.borrow_mut().take();
    }

    fn timer_fired(&self, token: TimerToken) {
        self.with_engine(|engine| {
            engine.timer_mut().release_fired(token);
            engine.timer_fired(token);
        });
    }

    fn start_observing(self: &Rc<Self>, element: &Element) {
        let weak = Rc::downgrade(self);
        let observed = SurfaceObserver::observe(element, move |batch: Vec<SurfaceMutation>| {
            if let Some(inner) = weak.upgrade() {
                inner.with_engine(|engine| engine.surface_mutated(&batch));
            }
        });
        match observed {
            Ok(observer) => *self.observer.borrow_mut() = Some(observer),
            Err(error) => {
                tracing::warn!(
                    target: "smartbar::bridge",
                    %error,
                    "could not observe surface"
                );
            }
        }
    }

    fn stop_observing(&self) {
        let observer = self.observer.borrow_mut().take();
        if let Some(observer) = observer {
            observer.disconnect();
            release_later(observer);
        }
    }

    fn attach_listeners(self: &Rc<Self>, element: &Element) {
        let target: &EventTarget = element.as_ref();
        let document: EventTarget = gloo_utils::document().into();
        let blocking = EventListenerOptions::enable_prevent_default();

        let mut listeners = Vec::with_capacity(7);

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new_with_options(
            target,
            "beforeinput",
            blocking,
            move |event| {
                let (Some(inner), Some(event)) =
                    (weak.upgrade(), event.dyn_ref::<web_sys::InputEvent>())
                else {
                    return;
                };
                let raw = events::raw_edit_from_event(event, inner.engine.borrow().surface());
                tracing::trace!(
                    target: "smartbar::dom",
                    input_type = ?raw.input_type,
                    "beforeinput"
                );
                let result = inner.with_engine(|engine| engine.before_input(raw));
                if result == BeforeInputResult::Handled {
                    event.prevent_default();
                }
            },
        ));

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new_with_options(
            target,
            "keydown",
            blocking,
            move |event| {
                let (Some(inner), Some(event)) =
                    (weak.upgrade(), event.dyn_ref::<web_sys::KeyboardEvent>())
                else {
                    return;
                };
                let key = event.key();
                let result = inner.with_engine(|engine| engine.key_down(&key));
                if result == KeydownResult::Handled {
                    event.prevent_default();
                }
            },
        ));

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new(target, "keyup", move |event| {
            let (Some(inner), Some(event)) =
                (weak.upgrade(), event.dyn_ref::<web_sys::KeyboardEvent>())
            else {
                return;
            };
            let trigger = events::key_up_trigger(event);
            inner.with_engine(|engine| engine.navigate(trigger));
        }));

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new(target, "mouseup", move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.with_engine(|engine| engine.navigate(NavigationTrigger::PointerUp));
            }
        }));

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new(target, "compositionstart", move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.with_engine(|engine| engine.composition_start());
            }
        }));

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new(target, "compositionend", move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.with_engine(|engine| engine.composition_end());
            }
        }));

        let weak = Rc::downgrade(self);
        listeners.push(EventListener::new(&document, "selectionchange", move |_| {
            if let Some(inner) = weak.upgrade() {
                inner.with_engine(|engine| {
                    engine.navigate(NavigationTrigger::SelectionChange)
                });
            }
        }));

        *self.listeners.borrow_mut() = listeners;
    }

    fn detach_listeners(&self) {
        let listeners = std::mem::take(&mut *self.listeners.borrow_mut());
        if !listeners.is_empty() {
            release_later(listeners);
        }
    }
}

/// Drop `value` from a fresh task.
///
/// Teardown can be requested from inside one of our own callbacks (an owner
/// reacting to a special key, say), and a closure must not be freed while it
/// is running.
fn release_later<T: 'static>(value: T) {
    let _ = Timeout::new(0, move || drop(value)).forget();
}
