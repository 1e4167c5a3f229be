mod api;
mod content;
mod session;
#[cfg(test)]
pub(crate) mod test_server;

pub use api::ApiClient;
pub use content::{ContentRepository, HttpContentRepository};
pub use session::Session;
