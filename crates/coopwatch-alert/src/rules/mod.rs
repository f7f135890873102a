pub mod device_status;
pub mod environment;
pub mod supply;
pub mod threshold;
