use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ControlError {
    #[error("invalid room dimensions {width} x {depth}: both must be finite and positive")]
    InvalidDimensions { width: f32, depth: f32 },
}
