#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use core::time::Duration;

use hovertip::overlay::{HostError, TooltipHost, TooltipOverlay};
use hovertip::render::{OverlayFrame, OverlayRenderer, TooltipContent};
use hovertip::TooltipConfig;
use hovertip_core::anchor::BoxMetrics;
use hovertip_core::event::{HostEvent, PointerEvent, PointerPhase};
use hovertip_core::geometry::{Point, Size};
use hovertip_core::timer::{TimerId, TimerKind, Timers};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, Event, EventTarget, HtmlElement, MouseEvent, Node, Window};

use crate::metrics::{PADDING_PROPERTIES, box_metrics, timeout_millis};

/// Tooltip state shared between the JS-facing handle and DOM callbacks.
struct Shared {
    host: DomHost,
    tooltip: TooltipOverlay<Node>,
}

/// Deliver `event` to the tooltip behind `shared`, if it is still alive.
fn deliver(shared: &Weak<RefCell<Shared>>, event: HostEvent) {
    let Some(shared) = shared.upgrade() else {
        return;
    };
    let Ok(mut guard) = shared.try_borrow_mut() else {
        hovertip_core::debug!(?event, "re-entrant DOM callback dropped");
        return;
    };
    let Shared { host, tooltip } = &mut *guard;
    tooltip.handle(event, host);
}

/// A scheduled `setTimeout` and the callback it will invoke.
struct Timeout {
    handle: i32,
    callback: Closure<dyn FnMut()>,
}

/// [`TooltipHost`] over the browser DOM.
///
/// Anchor metrics are read from the first element child of the anchor
/// wrapper. The overlay is a `div` appended to `document.body`.
pub struct DomHost {
    window: Window,
    document: Document,
    body: HtmlElement,
    anchor: Element,
    overlay: Option<Element>,
    timers: HashMap<TimerId, Timeout>,
    // Callbacks of fired timers. Dropped on the next expiry, never while
    // their own callback is on the stack.
    retired: Vec<Closure<dyn FnMut()>>,
    next_id: u64,
    shared: Weak<RefCell<Shared>>,
}

impl DomHost {
    fn fire(&mut self, id: TimerId) -> bool {
        self.retired.clear();
        match self.timers.remove(&id) {
            Some(timeout) => {
                self.retired.push(timeout.callback);
                true
            }
            None => false,
        }
    }

    fn clear_all(&mut self) {
        for (_, timeout) in self.timers.drain() {
            self.window.clear_timeout_with_handle(timeout.handle);
        }
    }
}

impl Timers for DomHost {
    fn schedule(&mut self, kind: TimerKind, delay: Duration) -> TimerId {
        self.next_id += 1;
        let id = TimerId::from_raw(self.next_id);
        let shared = self.shared.clone();
        let callback = Closure::<dyn FnMut()>::new(move || {
            let Some(rc) = shared.upgrade() else {
                return;
            };
            let fired = match rc.try_borrow_mut() {
                Ok(mut guard) => guard.host.fire(id),
                Err(_) => false,
            };
            if fired {
                deliver(&shared, HostEvent::Timer(id));
            }
        });

        match self.window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.as_ref().unchecked_ref(),
            timeout_millis(delay),
        ) {
            Ok(handle) => {
                self.timers.insert(
                    id,
                    Timeout {
                        handle,
                        callback,
                    },
                );
            }
            Err(err) => {
                hovertip_core::warn!(?kind, ?err, "setTimeout failed, timer will never fire");
            }
        }
        id
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(timeout) = self.timers.remove(&id) {
            self.window.clear_timeout_with_handle(timeout.handle);
        }
    }
}

impl TooltipHost<Node> for DomHost {
    fn viewport(&self) -> Size {
        let width = self.window.inner_width().ok().and_then(|v| v.as_f64());
        let height = self.window.inner_height().ok().and_then(|v| v.as_f64());
        Size::new(width.unwrap_or(0.0), height.unwrap_or(0.0))
    }

    fn measure_anchor(&self) -> Option<BoxMetrics> {
        let target = self.anchor.first_element_child()?;
        let rect = target.get_bounding_client_rect();
        let style = self.window.get_computed_style(&target).ok().flatten()?;
        let padding = PADDING_PROPERTIES.map(|p| style.get_property_value(p).unwrap_or_default());
        Some(box_metrics(
            rect.x(),
            rect.y(),
            rect.width(),
            rect.height(),
            [&padding[0], &padding[1], &padding[2], &padding[3]].map(String::as_str),
        ))
    }

    fn mount(&mut self, frame: &OverlayFrame, content: &TooltipContent<Node>) -> Result<(), HostError> {
        let mount_err = |err: JsValue| HostError::Mount(format!("{err:?}"));

        let div = self.document.create_element("div").map_err(mount_err)?;
        apply_frame(&div, frame);
        match content {
            TooltipContent::Text(text) => {
                let wrapper = self.document.create_element("div").map_err(mount_err)?;
                wrapper
                    .set_attribute("style", &OverlayRenderer::text_style().to_css())
                    .map_err(mount_err)?;
                wrapper.set_text_content(Some(text.as_str()));
                div.append_child(&wrapper).map_err(mount_err)?;
            }
            TooltipContent::Visual(node) => {
                div.append_child(node).map_err(mount_err)?;
            }
        }
        self.body.append_child(&div).map_err(mount_err)?;
        self.overlay = Some(div);
        Ok(())
    }

    fn update(&mut self, frame: &OverlayFrame) {
        if let Some(div) = &self.overlay {
            apply_frame(div, frame);
        }
    }

    fn measure_overlay(&self) -> Option<Size> {
        let rect = self.overlay.as_ref()?.get_bounding_client_rect();
        Some(Size::new(rect.width(), rect.height()))
    }

    fn unmount(&mut self) {
        if let Some(div) = self.overlay.take() {
            div.remove();
        }
    }
}

fn apply_frame(element: &Element, frame: &OverlayFrame) {
    let class = element.set_attribute("class", &frame.class_name());
    let style = element.set_attribute("style", &frame.style.to_css());
    if class.is_err() || style.is_err() {
        hovertip_core::debug!("overlay attributes rejected");
    }
}

/// Event listener registration that is removed on drop.
pub struct ListenerGuard {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

impl ListenerGuard {
    /// Register `handler` for `kind` on `target`.
    pub fn new(
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> Result<Self, JsValue> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        Ok(Self {
            target: target.clone(),
            kind,
            callback,
        })
    }
}

impl Drop for ListenerGuard {
    fn drop(&mut self) {
        let _ = self
            .target
            .remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
    }
}

/// Pointer listener delivering `phase` with the mouse's client position.
fn pointer_listener(
    anchor: &Element,
    kind: &'static str,
    phase: PointerPhase,
    shared: Weak<RefCell<Shared>>,
) -> Result<ListenerGuard, JsValue> {
    ListenerGuard::new(anchor, kind, move |event: Event| {
        let Some(mouse) = event.dyn_ref::<MouseEvent>() else {
            return;
        };
        let position = Point::new(f64::from(mouse.client_x()), f64::from(mouse.client_y()));
        deliver(&shared, HostEvent::Pointer(PointerEvent::new(phase, position)));
    })
}

struct Active {
    // Dropped before `shared` so no listener outlives the tooltip.
    listeners: Vec<ListenerGuard>,
    shared: Rc<RefCell<Shared>>,
}

/// Cursor-following tooltip bound to a DOM element.
#[wasm_bindgen]
pub struct WebTooltip {
    active: Option<Active>,
}

#[wasm_bindgen]
impl WebTooltip {
    /// Attach a tooltip to `anchor`.
    ///
    /// `content` is a string (text tooltip) or a DOM node (visual tooltip).
    /// `options` is an optional plain object with `displayDelay`,
    /// `hideDelay`, `opacity`, `color`, `className`, and `style`.
    ///
    /// Without a window, document, or body the tooltip is inert.
    #[wasm_bindgen(constructor)]
    pub fn new(anchor: Element, content: JsValue, options: JsValue) -> Result<WebTooltip, JsValue> {
        let content = if let Some(text) = content.as_string() {
            TooltipContent::Text(text)
        } else {
            let node = content
                .dyn_into::<Node>()
                .map_err(|_| JsValue::from_str("tooltip content must be a string or a DOM node"))?;
            TooltipContent::Visual(node)
        };
        let config = parse_options(&options)?;

        let Some(window) = web_sys::window() else {
            hovertip_core::warn!("no window, tooltip suppressed");
            return Ok(Self { active: None });
        };
        let Some(document) = window.document() else {
            hovertip_core::warn!("no document, tooltip suppressed");
            return Ok(Self { active: None });
        };
        let Some(body) = document.body() else {
            hovertip_core::warn!("no document body, tooltip suppressed");
            return Ok(Self { active: None });
        };

        let shared = Rc::new_cyclic(|weak: &Weak<RefCell<Shared>>| {
            RefCell::new(Shared {
                host: DomHost {
                    window: window.clone(),
                    document,
                    body,
                    anchor: anchor.clone(),
                    overlay: None,
                    timers: HashMap::new(),
                    retired: Vec::new(),
                    next_id: 0,
                    shared: weak.clone(),
                },
                tooltip: TooltipOverlay::new(content, config),
            })
        });
        {
            let mut guard = shared.borrow_mut();
            let Shared { host, tooltip } = &mut *guard;
            tooltip.attach(host);
        }

        let weak = Rc::downgrade(&shared);
        let window_target: &EventTarget = window.as_ref();
        let listeners = vec![
            pointer_listener(&anchor, "mouseenter", PointerPhase::Enter, weak.clone())?,
            pointer_listener(&anchor, "mouseleave", PointerPhase::Leave, weak.clone())?,
            pointer_listener(&anchor, "mousemove", PointerPhase::Move, weak.clone())?,
            {
                let weak = weak.clone();
                let window = window.clone();
                ListenerGuard::new(window_target, "resize", move |_| {
                    let width = window.inner_width().ok().and_then(|v| v.as_f64());
                    let height = window.inner_height().ok().and_then(|v| v.as_f64());
                    let size = Size::new(width.unwrap_or(0.0), height.unwrap_or(0.0));
                    deliver(&weak, HostEvent::Resize(size));
                })?
            },
            {
                let weak = weak.clone();
                ListenerGuard::new(window_target, "scroll", move |_| {
                    deliver(&weak, HostEvent::Scroll);
                })?
            },
        ];

        Ok(Self {
            active: Some(Active { listeners, shared }),
        })
    }

    /// Whether the tooltip is attached to a live DOM.
    #[wasm_bindgen(js_name = isActive)]
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Detach listeners, cancel timers, and remove the overlay.
    pub fn destroy(&mut self) {
        let Some(mut active) = self.active.take() else {
            return;
        };
        active.listeners.clear();
        if let Ok(mut guard) = active.shared.try_borrow_mut() {
            let Shared { host, tooltip } = &mut *guard;
            tooltip.handle(HostEvent::Unmount, host);
            host.clear_all();
        }
    }
}

impl Drop for WebTooltip {
    fn drop(&mut self) {
        self.destroy();
    }
}

fn parse_options(options: &JsValue) -> Result<TooltipConfig, JsValue> {
    if options.is_undefined() || options.is_null() {
        return Ok(TooltipConfig::default());
    }
    let json = js_sys::JSON::stringify(options)?;
    let json = json.as_string().unwrap_or_default();
    TooltipConfig::from_json_str(&json).map_err(|err| JsValue::from_str(&err.to_string()))
}
