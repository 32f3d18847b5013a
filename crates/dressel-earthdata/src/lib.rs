pub mod client;
pub mod token;

pub use client::{DEFAULT_BASE_URL, EarthdataClient};
pub use token::{TokenError, default_token_path, load_token};
