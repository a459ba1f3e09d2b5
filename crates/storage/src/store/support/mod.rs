#![forbid(unsafe_code)]

mod rows_tx;
mod schema;
mod time;

pub(super) use rows_tx::*;
pub(super) use schema::install_schema;
pub(super) use time::now_ms;
