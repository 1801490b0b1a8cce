use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{Element, MouseEvent};

use super::render::{self, Positions};
use super::state::{ForceGraphState, LinkView};
use super::types::GraphData;
use crate::config::GraphConfig;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn request_frame(cb: &Closure<dyn FnMut()>) -> Option<i32> {
	web_sys::window()?
		.request_animation_frame(cb.as_ref().unchecked_ref())
		.ok()
}

// Pointer positions arrive in client space; the svg may be scaled by CSS.
fn pointer(state: &mut ForceGraphState, ev: &MouseEvent) -> (f64, f64) {
	if let Some(svg) = ev
		.current_target()
		.and_then(|t| t.dyn_into::<Element>().ok())
	{
		let rect = svg.get_bounding_client_rect();
		state.set_screen_rect(rect.left(), rect.top(), rect.width());
	}
	(ev.client_x() as f64, ev.client_y() as f64)
}

/// Force-directed SVG view of `data`. Every new snapshot is reconciled
/// against the running layout by node id.
#[component]
pub fn ForceGraphSvg(
	#[prop(into)] data: Signal<GraphData>,
	#[prop(optional)] config: GraphConfig,
) -> impl IntoView {
	let state = Rc::new(RefCell::new(ForceGraphState::new(config.clone())));
	let node_ids = RwSignal::new(Vec::<String>::new());
	let links = RwSignal::new(Vec::<LinkView>::new());
	let positions = RwSignal::new(Positions::new());

	let state_update = state.clone();
	Effect::new(move |_| {
		let snapshot = data.get();
		let mut s = state_update.borrow_mut();
		s.update(&snapshot);
		node_ids.set(s.node_ids());
		links.set(s.links().to_vec());
		positions.set(s.positions());
	});

	let animate: FrameCallback = Rc::new(RefCell::new(None));
	let frame_id = Rc::new(Cell::new(None::<i32>));
	let (state_anim, animate_inner, frame_inner) =
		(state.clone(), animate.clone(), frame_id.clone());
	*animate.borrow_mut() = Some(Closure::new(move || {
		{
			let mut s = state_anim.borrow_mut();
			if s.tick() {
				positions.set(s.positions());
			}
		}
		if let Some(ref cb) = *animate_inner.borrow() {
			frame_inner.set(request_frame(cb));
		}
	}));
	if let Some(ref cb) = *animate.borrow() {
		frame_id.set(request_frame(cb));
	}

	let teardown = SendWrapper::new((animate, frame_id));
	on_cleanup(move || {
		let (animate, frame_id) = teardown.take();
		if let (Some(window), Some(id)) = (web_sys::window(), frame_id.take()) {
			let _ = window.cancel_animation_frame(id);
		}
		animate.borrow_mut().take();
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let mut s = state_md.borrow_mut();
		let (x, y) = pointer(&mut s, &ev);
		if let Some(id) = s.node_at_position(x, y) {
			ev.prevent_default();
			s.drag_start(&id, x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let mut s = state_mm.borrow_mut();
		if s.is_dragging() {
			let (x, y) = pointer(&mut s, &ev);
			s.drag_to(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |_: MouseEvent| state_mu.borrow_mut().drag_end();

	let state_ml = state;
	let on_mouseleave = move |_: MouseEvent| state_ml.borrow_mut().drag_end();

	view! {
		<svg
			class="table-force-graph"
			width=config.width.to_string()
			height=config.height.to_string()
			viewBox=format!("0 0 {} {}", config.width, config.height)
			style="display: block; max-width: 100%; height: auto; cursor: grab;"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
		>
			{render::link_layer(links, positions, &config)}
			{render::node_layer(node_ids, positions, &config)}
		</svg>
	}
}
