//! Which graphs exist for the document currently shown.

use std::cell::RefCell;

use js_sys::Function;
use log::{error, info};
use wasm_bindgen::prelude::*;

use crate::error::{GraphError, Result};
use crate::table::{TableGraph, attach_all, load_config};

thread_local! {
	static MOUNTED: RefCell<Vec<TableGraph>> = const { RefCell::new(Vec::new()) };
}

#[wasm_bindgen]
extern "C" {
	// Material for MkDocs replays the current document to new subscribers
	// and emits again after every instant navigation.
	type Observable;

	#[wasm_bindgen(method)]
	fn subscribe(this: &Observable, next: &Function) -> JsValue;
}

/// Drops the graphs of the previous document, then attaches to every marked
/// table of the current one. Returns how many graphs were attached.
pub fn remount() -> Result<usize> {
	detach_all();
	let document = web_sys::window()
		.ok_or(GraphError::NoWindow)?
		.document()
		.ok_or(GraphError::NoDocument)?;
	let config = load_config(&document);
	let graphs = attach_all(&document, &config)?;
	let count = graphs.len();
	MOUNTED.with_borrow_mut(|mounted| mounted.extend(graphs));
	Ok(count)
}

/// Tears down every attached graph. Returns how many were removed.
pub fn detach_all() -> usize {
	// Teardown runs outside the borrow; unmounting may call back into us.
	let graphs = MOUNTED.with_borrow_mut(std::mem::take);
	graphs.len()
}

/// JS entry for hosts that manage their own view lifecycle.
#[wasm_bindgen(js_name = attachGraphs)]
pub fn attach_graphs() -> std::result::Result<usize, JsValue> {
	remount().map_err(|e| JsValue::from_str(&e.to_string()))
}

/// JS counterpart of [`detach_all`].
#[wasm_bindgen(js_name = detachGraphs)]
pub fn detach_graphs() -> usize {
	detach_all()
}

/// Attaches now, or on every `document$` emission when the page has one.
pub fn start() -> Result<()> {
	let window = web_sys::window().ok_or(GraphError::NoWindow)?;
	let observable = js_sys::Reflect::get(&window, &JsValue::from_str("document$"))?;
	if observable.is_undefined() || observable.is_null() {
		remount()?;
		return Ok(());
	}

	info!("following document$ for page changes");
	let on_document = Closure::<dyn FnMut()>::new(|| {
		if let Err(e) = remount() {
			error!("table graphs not attached: {e}");
		}
	});
	observable
		.unchecked_into::<Observable>()
		.subscribe(on_document.as_ref().unchecked_ref());
	// Subscribed for the lifetime of the page.
	on_document.forget();
	Ok(())
}
