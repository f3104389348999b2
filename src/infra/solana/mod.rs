pub mod client;
pub mod program;

pub use client::{load_payer, send_and_confirm, BlinkChain, RpcChain};
pub use program::{
    blink_list_pda, close_blink_instruction, create_blink_instruction, decode_blink_list,
    delete_blink_instruction, BLINK_LIST_SEED, BLINK_LIST_SPACE,
};
