//! Template engine tests, split by feature

use super::*;

mod helpers;

mod tokenstream;

mod render_basic;
mod render_conditionals;
mod render_escaping;
mod render_loops;

mod errors;
