pub mod scene_list;
pub mod status_bar;
pub mod toolbar;
