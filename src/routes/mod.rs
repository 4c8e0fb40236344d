pub mod activity;
pub mod campaigns;
pub mod chat;
pub mod dashboard;
pub mod health;
pub mod insights;
