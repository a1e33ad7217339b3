pub mod dispatcher;
pub mod handler;
pub mod protocol;
pub mod relay;
pub mod signaling;
pub mod storage;
