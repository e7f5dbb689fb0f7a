pub mod html;
pub mod xlsx;

pub use crate::errors::ResultResp;

// Normal HTML response
pub use html::{html_response, html_response_with_status, redirect_response};
pub use xlsx::xlsx_response;
