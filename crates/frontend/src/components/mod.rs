pub mod bottom_sheet;
pub mod map_view;
pub mod region_panel;
