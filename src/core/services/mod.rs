pub mod filter_service;
pub mod summary_service;

pub use filter_service::{EntryFilter, FilterService, MonthFilter};
pub use summary_service::{CategoryShare, CategoryTotal, SummaryService, Totals};
