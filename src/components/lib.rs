pub mod checkbox;
pub mod cursor;
pub mod popup;
pub mod videotable;
