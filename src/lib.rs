pub mod constants;
pub mod erfinv;
pub mod event;
pub mod frc_events;
pub mod http_client;
pub mod pool;
pub mod pool_export;
pub mod records;
pub mod scoring;
pub mod season;
pub mod team;
