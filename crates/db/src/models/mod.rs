pub mod block_gate;
pub mod progress;
pub mod user;
pub mod workshop_session;
