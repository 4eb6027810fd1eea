pub mod live_view;
pub mod result_panel;
