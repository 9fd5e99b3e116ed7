//! Step wizard engine for marketplace onboarding and booking flows, with a
//! vim-style terminal front-end.

pub mod app;
pub mod config;
pub mod draft;
pub mod error;
pub mod event;
pub mod flow;
pub mod form;
pub mod prefetch;
pub mod ui;
pub mod vim;
pub mod wizard;
