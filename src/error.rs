//! Errors raised while wiring graphs into the page.

use wasm_bindgen::JsValue;

/// Failures of the DOM plumbing. The graph core itself never fails.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
	/// No `window` global, e.g. when running outside a browser.
	#[error("no global window")]
	NoWindow,
	/// The window has no document.
	#[error("window has no document")]
	NoDocument,
	/// An exception thrown by a DOM or TableFilter call.
	#[error("javascript error: {0}")]
	Js(String),
	/// The page's JSON override could not be parsed.
	#[error("invalid graph configuration: {0}")]
	Config(#[from] serde_json::Error),
}

impl From<JsValue> for GraphError {
	fn from(value: JsValue) -> Self {
		let message = value
			.as_string()
			.or_else(|| {
				js_sys::Reflect::get(&value, &JsValue::from_str("message"))
					.ok()
					.and_then(|m| m.as_string())
			})
			.unwrap_or_else(|| format!("{value:?}"));
		GraphError::Js(message)
	}
}

/// Result alias for the DOM-facing API.
pub type Result<T> = std::result::Result<T, GraphError>;
