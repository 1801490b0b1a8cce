mod component;
mod handle;
mod render;
mod simulation;
mod state;
mod types;

pub use component::ForceGraphSvg;
pub use handle::{GraphHandle, render};
pub use simulation::{SimNode, Simulation, default_position};
pub use state::{ForceGraphState, LinkView, stroke_width};
pub use types::{GraphData, GraphLink, GraphNode, Row, build_graph};
