//! RSX components for the site chart screen.

mod graph_svg;
mod legend_dropdown;
mod site_selector;
mod status_line;
mod tooltip_card;

pub use graph_svg::GraphSvg;
pub use legend_dropdown::LegendDropdown;
pub use site_selector::SiteSelector;
pub use status_line::StatusLine;
pub use tooltip_card::TooltipCard;
