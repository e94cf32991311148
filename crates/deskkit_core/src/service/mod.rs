//! Stateful services layered over the repositories.
//!
//! # Responsibility
//! - Drive time-based behavior (countdown, delayed replies) that a plain
//!   repository call cannot express.

pub mod chat_service;
pub mod pomodoro_timer;
