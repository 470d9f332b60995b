//! Hardware-independent core library for the cgm trend widget
//!
//! This crate contains the platform-agnostic pieces of the glucose trend
//! chart: the threshold-colored chart renderer, color parsing, glucose unit
//! handling, the settings model and an in-memory framebuffer.
//!
//! It is `#![no_std]` with `extern crate alloc` so it can be driven by any
//! `embedded-graphics` draw target, from a desktop host to a small panel.

#![no_std]

extern crate alloc;

pub mod chart;
pub mod config;
pub mod framebuffer;
mod math;
pub mod units;
