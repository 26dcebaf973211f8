//! Data models: the extracted record and the locale pattern table.

pub mod locale;
pub mod record;
