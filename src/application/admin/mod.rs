//! Application services for the administrative surface.

pub mod articles;
pub mod categories;
pub mod comments;
pub mod dashboard;
pub mod pages;
pub mod settings;
pub mod uploads;

pub(crate) fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        Err(field)
    } else {
        Ok(())
    }
}
