//! Benchmark driver for the trivium execution backends.
//!
//! Holds the two sample programs as builder-constructed trees and their
//! input seeding helpers. The binary in this crate runs a program on a
//! chosen backend and reports wall time; the criterion benches compare all
//! three backends on the same trees.

pub mod programs;
