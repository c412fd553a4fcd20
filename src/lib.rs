//! Explicit (FTCS) finite-difference simulation of heat diffusion on a bar.

pub mod d1;
