//! # Gatewayエンドポイント

pub mod delete;
pub mod download;
pub mod images;
pub mod search;
mod signing;
pub mod upload;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use delete::handle_delete;
pub use download::handle_download;
pub use images::handle_list_images;
pub use search::handle_search;
pub use upload::handle_upload;
