use super::traits::{PoseAdjustment, Redirector, Resetter, TickContext};
use crate::geometry::RoomGeometry;

/// Lets movement through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRedirector;

impl Redirector for NullRedirector {
    fn name(&self) -> &str {
        "null"
    }

    fn initialize(&mut self, _geometry: &RoomGeometry) {}

    fn apply_redirection(&mut self, _ctx: &TickContext<'_>) -> PoseAdjustment {
        PoseAdjustment::NONE
    }
}

/// Never reports the user out of bounds and never agrees to a reset.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullResetter;

impl Resetter for NullResetter {
    fn name(&self) -> &str {
        "null"
    }

    fn initialize(&mut self, _geometry: &RoomGeometry) {}

    fn is_user_out_of_bounds(&self, _ctx: &TickContext<'_>) -> bool {
        false
    }

    fn is_reset_required(&self, _ctx: &TickContext<'_>) -> bool {
        false
    }

    fn initialize_reset(&mut self, _ctx: &TickContext<'_>) {}

    fn apply_resetting(&mut self, _ctx: &TickContext<'_>) -> PoseAdjustment {
        PoseAdjustment::NONE
    }

    fn finalize_reset(&mut self) {}
}
