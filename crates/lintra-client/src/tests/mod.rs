//! Test suite for the lifecycle controller and entry points.

mod support;
