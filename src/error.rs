use thiserror::Error;

/// Errors surfaced before the stage chain runs.
///
/// Parameters are checked eagerly so that an unphysical input fails with a
/// named parameter instead of propagating NaN through nine multiplicative
/// stages.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum LinkError {
    /// A parameter lies outside its physically valid domain.
    #[error("invalid parameter {name}: {value} (expected {constraint})")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        constraint: &'static str,
    },
}
