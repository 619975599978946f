mod display;
pub(crate) mod json;
