pub mod format;
pub mod strings;
#[cfg(test)]
pub mod testrender;
