/// State management module
///
/// This module handles all application state, including:
/// - Discovering the image series on disk (catalog.rs)
/// - Shared data structures (data.rs)
/// - Operator-adjustable view parameters and the exported summary (view.rs)

pub mod catalog;
pub mod data;
pub mod view;
