pub mod error;
pub mod handle;
pub mod scheduler;

pub use error::Error;
pub use handle::PlannerHandle;
pub use scheduler::spawn_planner;
