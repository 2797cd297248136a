//! examples of usage of RustedLinSolve
/// linear systems: circuits solved once and evaluated many times, identity equations, random systems
pub mod linear_sys_examples;
