pub mod browse;
pub mod detail;
pub mod widgets;

pub use browse::render_browse_view;
pub use detail::render_detail_view;
