pub mod activity;
pub mod asset;
pub mod daily_module;
pub mod plan;
