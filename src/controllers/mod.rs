pub mod extract;
pub mod health;
pub mod narration;
pub mod report;
