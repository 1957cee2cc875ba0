//! Synchronized text/raw editing of game resources, plus the packed color
//! field editor.

pub mod app;
