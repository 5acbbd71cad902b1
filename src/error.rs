// src/error.rs
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    #[error("Invalid area: min ({min_x}, {min_y}) exceeds max ({max_x}, {max_y})")]
    InvalidArea {
        min_x: i32,
        min_y: i32,
        max_x: i32,
        max_y: i32,
    },

    #[error("Coordinate ({x}, {y}) lies outside the container area")]
    OutsideArea { x: i32, y: i32 },

    #[error("No element at coordinate ({x}, {y})")]
    MissingCoordinate { x: i32, y: i32 },

    #[error("Numeric computation failed: {operation}")]
    NumericFailure { operation: String },
}

pub type CoverResult<T> = Result<T, CoverError>;
