pub(crate) mod calibration;
pub(crate) mod model;
pub(crate) mod parser;
pub(crate) mod source;
