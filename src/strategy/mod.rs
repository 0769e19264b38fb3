mod curvature;
mod null;
mod planning;
mod traits;
mod turn;

pub use curvature::CurvatureRedirector;
pub use null::{NullRedirector, NullResetter};
pub use planning::{PlanningRedirector, plan_toward_center};
pub use traits::{PoseAdjustment, Redirector, Resetter, Steering, TickContext};
pub use turn::TurnResetter;
