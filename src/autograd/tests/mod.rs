//! Gradient checks for autograd operations
