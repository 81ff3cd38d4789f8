pub(crate) mod declaration;
pub(crate) mod steps;
