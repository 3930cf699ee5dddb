pub(crate) mod model;
pub(crate) mod session;
pub(crate) mod steps;
