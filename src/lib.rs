//! Maintainer utilities: `jsonurl` digs a value out of a JSON endpoint and
//! `push-commits` pushes a reviewed branch and closes its ReviewBoard requests.

pub mod cli;
pub mod config;
pub mod error;
pub mod jsonurl;
pub mod logging;
pub mod push;
pub mod review;
pub mod vcs;
