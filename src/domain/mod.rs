pub mod channels;
pub mod dashboard;
pub mod grade;
pub mod inventory;
pub mod pickup;
pub mod pricing;
pub mod rate_card;

