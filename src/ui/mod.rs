//! Framework-neutral UI components. Each component is a plain struct whose
//! methods correspond to the events it reacts to; rendering produces view
//! structs that any toolkit (or a test) can consume.

pub mod field;
pub mod forms;
pub mod i18n;
pub mod modal;
pub mod toast;
pub mod topbar;
