//! Bindings to the TableFilter widget that owns a table's filter state.

use js_sys::{Array, Function};
use wasm_bindgen::prelude::*;

/// Event TableFilter emits once the visible rows changed.
pub const AFTER_FILTERING: &str = "after-filtering";

#[wasm_bindgen]
extern "C" {
	/// A TableFilter instance attached to one `<table>`.
	#[derive(Clone, Debug)]
	pub type TableFilter;

	/// Builds the widget; throws when the table layout is unsupported.
	#[wasm_bindgen(constructor, catch)]
	pub fn new(table: &web_sys::HtmlTableElement, options: &JsValue) -> Result<TableFilter, JsValue>;

	/// Injects the filter row and toolbar.
	#[wasm_bindgen(method, catch)]
	pub fn init(this: &TableFilter) -> Result<(), JsValue>;

	/// Visible rows as `[[rowIndex, [cell, ...]], ...]`.
	#[wasm_bindgen(method, js_name = getFilteredData)]
	pub fn get_filtered_data(this: &TableFilter) -> Array;

	/// Removes everything `init` added.
	#[wasm_bindgen(method, catch)]
	pub fn destroy(this: &TableFilter) -> Result<(), JsValue>;

	#[wasm_bindgen(method, getter)]
	fn emitter(this: &TableFilter) -> Emitter;

	#[derive(Clone, Debug)]
	type Emitter;

	#[wasm_bindgen(method)]
	fn on(this: &Emitter, events: &Array, handler: &Function);

	#[wasm_bindgen(method)]
	fn off(this: &Emitter, events: &Array, handler: &Function);
}

/// A subscription to `after-filtering`; dropping it unsubscribes.
pub struct FilterListener {
	emitter: Emitter,
	events: Array,
	callback: Closure<dyn FnMut()>,
}

impl FilterListener {
	/// Calls `handler` every time the filter's visible rows change.
	pub fn after_filtering(filter: &TableFilter, handler: impl FnMut() + 'static) -> Self {
		let events = Array::of1(&JsValue::from_str(AFTER_FILTERING));
		let callback = Closure::<dyn FnMut()>::new(handler);
		let emitter = filter.emitter();
		emitter.on(&events, callback.as_ref().unchecked_ref());
		Self {
			emitter,
			events,
			callback,
		}
	}
}

impl Drop for FilterListener {
	fn drop(&mut self) {
		self.emitter
			.off(&self.events, self.callback.as_ref().unchecked_ref());
	}
}
