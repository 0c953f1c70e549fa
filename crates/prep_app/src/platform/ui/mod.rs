pub mod render;
pub mod result_pane;
