//! Offline tooling over the gwscan normalizers: feed it payload files and
//! query parameters, get back the view models a page would render.

pub mod cli;
