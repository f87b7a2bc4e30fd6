//! Integration-style tests exercising the public [crate::compile] entry
//! point end to end, mirroring the teacher's `examples/__tests__`
//! submodule placement convention.
mod properties;
mod scenarios;
