//! Domain types: Blinks and the transfers they describe.

pub mod blink;
pub mod transfer;

pub use blink::{next_blink_id, Blink, BlinkDraft, BlinkLink, BlinkList, LinkedAction};
