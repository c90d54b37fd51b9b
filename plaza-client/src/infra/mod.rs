pub mod api_client;
pub mod error;
pub mod services;

pub use api_client::ApiClient;
pub use error::{ClientError, ClientResult};
