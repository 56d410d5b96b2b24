use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::debug;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::render;
use super::state::{CLICK_SLOP, ForceGraphState};
use super::types::Layout;
use crate::components::EngineHandle;
use crate::graph::Subscription;

fn canvas_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// Everything the canvas has to release when it unmounts.
#[derive(Default)]
struct Teardown {
	stopped: Rc<Cell<bool>>,
	frame: Rc<Cell<Option<i32>>>,
	animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
	subscription: Rc<RefCell<Option<Subscription>>>,
}

impl Teardown {
	/// Stops the frame loop and unsubscribes, returning the pending frame.
	///
	/// After this the frame closure never touches the engine or layout signal
	/// again, so both may be disposed.
	fn stop(&self) -> Option<i32> {
		self.stopped.set(true);
		// breaks the closure's reference to itself
		self.animate.borrow_mut().take();
		if let Some(sub) = self.subscription.borrow_mut().take() {
			sub.unsubscribe();
		}
		self.frame.take()
	}

	fn run(&self) {
		let window = web_sys::window();
		if let Some(cb) = self.resize_cb.borrow_mut().take() {
			if let Some(win) = &window {
				let _ = win.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}
		if let (Some(id), Some(win)) = (self.stop(), &window) {
			let _ = win.cancel_animation_frame(id);
		}
		debug!("canvas torn down");
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

/// Force/circular canvas renderer over a [`GraphViewEngine`](crate::graph::GraphViewEngine).
///
/// The drawable set is rebuilt from the engine on the first animation frame
/// after every engine notification.
#[component]
pub fn ForceGraphCanvas(
	engine: EngineHandle,
	#[prop(into, default = Signal::stored(Layout::Force))] layout: Signal<Layout>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state: Rc<RefCell<Option<ForceGraphState>>> = Rc::new(RefCell::new(None));
	let dirty = Rc::new(Cell::new(false));
	let teardown = Teardown::default();
	let (stopped, frame, subscription) = (
		teardown.stopped.clone(),
		teardown.frame.clone(),
		teardown.subscription.clone(),
	);
	let (state_init, animate_init, resize_cb_init, dirty_init) = (
		state.clone(),
		teardown.animate.clone(),
		teardown.resize_cb.clone(),
		dirty.clone(),
	);
	let teardown = StoredValue::new_local(teardown);
	on_cleanup(move || {
		teardown.try_with_value(Teardown::run);
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if stopped.get() {
			return;
		}
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			(
				width.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_width() as f64)
						.unwrap_or(800.0)
				}),
				height.unwrap_or_else(|| {
					canvas
						.parent_element()
						.map(|p| p.client_height() as f64)
						.unwrap_or(600.0)
				}),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			log::error!("canvas has no 2d context");
			return;
		};
		*state_init.borrow_mut() = Some(
			engine.with_value(|e| ForceGraphState::new(e, w, h, layout.get_untracked())),
		);

		if subscription.borrow().is_none() {
			let dirty = dirty_init.clone();
			let (sub, listeners) = engine.with_value(|e| {
				let sub = e.subscribe(move || dirty.set(true));
				(sub, e.listener_count())
			});
			*subscription.borrow_mut() = Some(sub);
			debug!("canvas subscribed to engine, {listeners} listeners");
		}

		if fullscreen && resize_cb_init.borrow().is_none() {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				if let Some(ref mut s) = *state_resize.borrow_mut() {
					s.resize(nw, nh);
				}
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ =
					window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		// the frame loop is started once and outlives repeated effect runs
		if animate_init.borrow().is_some() {
			return;
		}
		let (state_anim, animate_inner, dirty_anim, stopped_anim, frame_anim) = (
			state_init.clone(),
			animate_init.clone(),
			dirty_init.clone(),
			stopped.clone(),
			frame.clone(),
		);
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			frame_anim.set(None);
			// engine and layout may already be disposed
			if stopped_anim.get() {
				return;
			}
			if let Some(ref mut s) = *state_anim.borrow_mut() {
				let wanted = layout.get_untracked();
				if s.layout() != wanted {
					engine.with_value(|e| s.set_layout(wanted, e));
				}
				if dirty_anim.replace(false) {
					engine.with_value(|e| s.sync(e));
				}
				if s.animation_running {
					s.tick(0.016);
				}
				render::render(s, &ctx);
			}
			if let (Some(cb), Some(win)) = (&*animate_inner.borrow(), web_sys::window()) {
				frame_anim.set(win.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			frame.set(window.request_animation_frame(cb.as_ref().unchecked_ref()).ok());
		}
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut s) = *state_md.borrow_mut() {
			if let Some(idx) = s.node_at_position(x, y) {
				s.drag.active = true;
				s.drag.moved = false;
				s.drag.node_idx = Some(idx);
				s.drag.start_x = x;
				s.drag.start_y = y;
				s.graph.visit_nodes(|node| {
					if node.index() == idx {
						s.drag.node_start_x = node.x();
						s.drag.node_start_y = node.y();
					}
				});
			} else {
				s.pan.active = true;
				s.pan.moved = false;
				s.pan.start_x = x;
				s.pan.start_y = y;
				s.pan.transform_start_x = s.transform.x;
				s.pan.transform_start_y = s.transform.y;
			}
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};

		let mut hover_change = None;
		if let Some(ref mut s) = *state_mm.borrow_mut() {
			if !s.drag.active {
				let hovered = s.node_id_at_position(x, y);
				if engine.with_value(|e| e.hovered_node_id()) != hovered {
					hover_change = Some(hovered);
				}
			}

			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					let (dx, dy) = (x - s.drag.start_x, y - s.drag.start_y);
					if dx.hypot(dy) > CLICK_SLOP {
						s.drag.moved = true;
					}
					let (nx, ny) = (
						s.drag.node_start_x + (dx / s.transform.k) as f32,
						s.drag.node_start_y + (dy / s.transform.k) as f32,
					);
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.x = nx;
							node.data.y = ny;
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active {
				let (dx, dy) = (x - s.pan.start_x, y - s.pan.start_y);
				if dx.hypot(dy) > CLICK_SLOP {
					s.pan.moved = true;
				}
				s.transform.x = s.pan.transform_start_x + dx;
				s.transform.y = s.pan.transform_start_y + dy;
			}
		}
		if let Some(hovered) = hover_change {
			engine.with_value(|e| e.set_hovered_node(hovered));
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| {
		let mut selection = None;
		if let Some(ref mut s) = *state_mu.borrow_mut() {
			if s.drag.active {
				if let Some(idx) = s.drag.node_idx {
					if !s.drag.moved {
						selection = Some(s.node_id(idx));
					}
					s.graph.visit_nodes_mut(|node| {
						if node.index() == idx {
							node.data.is_anchor = true;
						}
					});
				}
			} else if s.pan.active && !s.pan.moved {
				// click on empty canvas
				selection = Some(None);
			}
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
		}
		if let Some(id) = selection {
			engine.with_value(|e| e.set_selected_node(id));
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Some(ref mut s) = *state_ml.borrow_mut() {
			s.drag.active = false;
			s.drag.node_idx = None;
			s.pan.active = false;
		}
		if engine.with_value(|e| e.hovered_node_id()).is_some() {
			engine.with_value(|e| e.set_hovered_node(None));
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = canvas_point(canvas_ref, &ev) else {
			return;
		};

		if let Some(ref mut s) = *state_wh.borrow_mut() {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			let new_k = (s.transform.k * factor).clamp(0.1, 10.0);
			let ratio = new_k / s.transform.k;
			s.transform.x = x - (x - s.transform.x) * ratio;
			s.transform.y = y - (y - s.transform.y) * ratio;
			s.transform.k = new_k;
		}
	};

	view! {
		<canvas
			node_ref=canvas_ref
			class="force-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			style="display: block; cursor: grab;"
		/>
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::ViewState;

	#[test]
	fn stopping_releases_subscription_and_frame() {
		let state = ViewState::new();
		let teardown = Teardown::default();
		*teardown.subscription.borrow_mut() = Some(state.subscribe(|| {}));
		teardown.frame.set(Some(7));
		assert_eq!(state.listener_count(), 1);

		assert_eq!(teardown.stop(), Some(7));
		assert!(teardown.stopped.get());
		assert_eq!(state.listener_count(), 0);

		// a second cleanup finds nothing left to release
		assert_eq!(teardown.stop(), None);
	}
}
