//! Request value objects for the Mailgun API.
//!
//! Every request type renders to one of three wire shapes consumed by the
//! transport:
//!
//! - ordered form pairs through [`FormPayload::to_form_content`]
//! - a JSON object through [`FormPayload::to_json`], carrying the same pairs
//! - a query string through `to_query_string` on the GET filters
//!
//! Field constraints are checked when a value is set, so a constructed value
//! is always renderable unless it was mutated directly afterwards.

mod address;
mod attachment;
mod domain;
mod encoding;
mod enums;
mod events;
mod form;
mod listing;
mod mailing_list;
mod message;
mod query;
mod route;
mod stats;
mod suppression;
mod webhook;

pub use address::*;
pub use attachment::*;
pub use domain::*;
pub use encoding::*;
pub use enums::*;
pub use events::*;
pub use form::*;
pub use listing::*;
pub use mailing_list::*;
pub use message::*;
pub use query::{encode_component, QueryStringBuilder};
pub use route::*;
pub use stats::*;
pub use suppression::*;
pub use webhook::*;
