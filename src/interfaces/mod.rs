pub mod board;

pub use board::{render_board, render_item};
