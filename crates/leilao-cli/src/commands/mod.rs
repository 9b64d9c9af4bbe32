pub mod checklist;
pub mod costs;
pub mod format;
pub mod steps;
