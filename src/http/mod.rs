//! HTTP protocol layer module
//!
//! Response builders, content-type inference and form decoding, decoupled
//! from routing and storage.

pub mod form;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use form::{parse_form, FormError};
pub use mime::{ContentTypes, ExtensionTable};
pub use response::{
    build_400_response, build_404_response, build_405_response, build_411_response,
    build_413_response, build_500_response, build_html_response, build_redirect_response,
    build_static_response,
};
