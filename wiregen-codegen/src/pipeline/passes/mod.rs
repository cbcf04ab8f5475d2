pub(crate) mod flatten;
pub(crate) mod strip;
