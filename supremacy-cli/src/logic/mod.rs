pub mod catalog;
pub mod reports;
pub mod tester;

pub use catalog::list_scenarios;
pub use tester::*;
