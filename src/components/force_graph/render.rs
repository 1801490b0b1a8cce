use std::collections::HashMap;

use leptos::prelude::*;

use super::state::LinkView;
use crate::config::GraphConfig;

/// Current simulated coordinates by node id.
pub type Positions = HashMap<String, (f64, f64)>;

// Unknown ids render as NaN, which the browser ignores.
fn coord(v: Option<(f64, f64)>, pick: fn((f64, f64)) -> f64) -> String {
	format!("{:.2}", v.map_or(f64::NAN, pick))
}

/// One `<line>` per link, keyed so duplicates and unchanged links survive
/// snapshot updates.
pub fn link_layer(
	links: RwSignal<Vec<LinkView>>,
	positions: RwSignal<Positions>,
	config: &GraphConfig,
) -> impl IntoView + use<> {
	view! {
		<g stroke=config.link_stroke.clone() stroke-opacity=config.link_stroke_opacity.to_string()>
			<For
				each=move || links.get()
				key=|link| link.key.clone()
				children=move |link: LinkView| {
					let LinkView { source, target, width, .. } = link;
					let ends = Memo::new(move |_| {
						positions.with(|p| (p.get(&source).copied(), p.get(&target).copied()))
					});
					view! {
						<line
							stroke-width=format!("{width:.2}")
							x1=move || coord(ends.get().0, |p| p.0)
							y1=move || coord(ends.get().0, |p| p.1)
							x2=move || coord(ends.get().1, |p| p.0)
							y2=move || coord(ends.get().1, |p| p.1)
						/>
					}
				}
			/>
		</g>
	}
}

/// One fixed-radius `<circle>` per node id.
pub fn node_layer(
	node_ids: RwSignal<Vec<String>>,
	positions: RwSignal<Positions>,
	config: &GraphConfig,
) -> impl IntoView + use<> {
	let (radius, fill) = (config.node_radius.to_string(), config.node_fill.clone());
	view! {
		<g stroke=config.node_stroke.clone() stroke-width=config.node_stroke_width.to_string()>
			<For
				each=move || node_ids.get()
				key=|id| id.clone()
				children=move |id: String| {
					let at = Memo::new(move |_| positions.with(|p| p.get(&id).copied()));
					view! {
						<circle
							r=radius.clone()
							fill=fill.clone()
							cx=move || coord(at.get(), |p| p.0)
							cy=move || coord(at.get(), |p| p.1)
						/>
					}
				}
			/>
		</g>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn coordinates_are_rounded() {
		assert_eq!(coord(Some((1.23456, 7.0)), |p| p.0), "1.23");
		assert_eq!(coord(Some((1.0, 7.0)), |p| p.1), "7.00");
	}

	#[test]
	fn missing_positions_degrade_to_nan() {
		assert_eq!(coord(None, |p| p.0), "NaN");
	}
}
