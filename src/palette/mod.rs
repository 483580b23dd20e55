pub mod bridge;
pub mod quantizer;
