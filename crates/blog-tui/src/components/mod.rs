pub mod help_overlay;
pub mod pagination_bar;
pub mod post_detail;
pub mod post_form;
pub mod post_list;
pub mod search_bar;
