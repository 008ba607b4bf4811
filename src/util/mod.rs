pub(crate) mod sanitize;
pub(crate) mod xml_util;
pub(crate) mod zip_util;
