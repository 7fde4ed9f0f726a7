pub mod actions;
pub mod db;
pub mod panel;
pub mod selection;
pub mod validation;
