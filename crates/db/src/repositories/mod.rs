pub mod block_gate_repo;
pub mod progress_repo;
pub mod session_repo;
pub mod user_repo;

pub use block_gate_repo::BlockGateRepo;
pub use progress_repo::ProgressRepo;
pub use session_repo::SessionRepo;
pub use user_repo::UserRepo;
