//! Reusable widgets drawn by the frame renderer.

pub mod composer;
pub mod footer_bar;
pub mod status_bar;
pub mod suggestion_list;
