use js_sys::Array;
use wasm_bindgen::JsValue;

use super::filter::TableFilter;
use crate::components::force_graph::Row;
use crate::config::ColumnMap;

/// Reads source, target and level from each row's cells, in row order.
/// Missing label cells read as empty labels; a missing or non-numeric level
/// reads as `None`.
pub fn rows_from_cells(cells: &[Vec<String>], columns: ColumnMap) -> Vec<Row> {
	cells
		.iter()
		.map(|row| {
			let cell = |i: usize| row.get(i).map(String::as_str).unwrap_or_default();
			Row::new(cell(columns.source), cell(columns.target), parse_level(cell(columns.level)))
		})
		.collect()
}

fn parse_level(text: &str) -> Option<f64> {
	text.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn cell_text(value: JsValue) -> String {
	value
		.as_string()
		.or_else(|| value.as_f64().map(|v| v.to_string()))
		.unwrap_or_default()
}

/// Cell texts of every visible row of `getFilteredData()`.
pub fn filtered_cells(data: &Array) -> Vec<Vec<String>> {
	data.iter()
		.map(|entry| {
			if !Array::is_array(&entry) {
				return Vec::new();
			}
			let cells = Array::from(&entry).get(1);
			if !Array::is_array(&cells) {
				return Vec::new();
			}
			Array::from(&cells).iter().map(cell_text).collect()
		})
		.collect()
}

/// Rows currently visible in `filter`.
pub fn extract_rows(filter: &TableFilter, columns: ColumnMap) -> Vec<Row> {
	rows_from_cells(&filtered_cells(&filter.get_filtered_data()), columns)
}
