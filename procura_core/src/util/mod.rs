pub mod currency;
pub mod price;
pub mod redact;
pub mod url;
