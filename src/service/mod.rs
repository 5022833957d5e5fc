pub mod address_parse;

pub use address_parse::{resolve_mandal_display_name, AddressParseService};
