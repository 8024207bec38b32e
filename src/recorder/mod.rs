pub mod capture;
pub mod click_event;
pub mod pipeline;
pub mod session;
pub mod state;
pub mod storage;
pub mod types;
