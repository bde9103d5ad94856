pub(crate) mod date_format;
