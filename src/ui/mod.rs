pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::{error, header, item_deleted, item_new, item_updated, success, summary_row, warn};
pub use table::{items_table, stats_table};
pub use theme::{palette, Palette};
