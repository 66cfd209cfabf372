pub(crate) mod fade;
pub(crate) mod pattern;
pub(crate) mod soul;
pub(crate) mod wheel;
