pub mod client;
pub mod codec;
pub mod handler;

pub use client::Client;
pub use codec::{encode_frame, encode_header, parse_header, FrameCodec};
pub use handler::handle_connection;
