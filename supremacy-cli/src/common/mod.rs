pub mod reports;
pub mod store;
pub mod util;

pub use reports::build_report;
pub use store::FileStore;
pub use util::{parse_mission_edit, parse_rank_edit, split_csv};
