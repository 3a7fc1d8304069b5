pub mod date;

pub use date::{format_date, parse_date_expr, parse_local_date_expr, resolve_today};
