pub mod constants;
pub(crate) mod convert;
