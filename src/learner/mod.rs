mod errors;
mod random;
mod traits;

pub use errors::LearnerError;
pub use random::RandomPolicy;
pub use traits::Policy;
