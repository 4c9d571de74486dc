//! Contains parsers and utilities related to **U**niform **R**esource **L**ocators ([URL]s).
//!
//! You can find the relevant specification [here](https://url.spec.whatwg.org/).
//!
//! The preferred way to obtain a [URL] is to parse it like this:
//! ```
//! # use url::URL;
//! let url: URL = "https://google.com".parse().unwrap();
//!
//! assert_eq!(url.scheme(), "https");
//! ```

mod error;
pub mod form_urlencoded;
mod host;
mod ip;
mod parser;
mod path;
mod percent_encode;
mod url;
mod util;

pub use crate::error::{
    CollectValidationErrors, FormDecodeError, HostParseError, IPParseError,
    IgnoreValidationErrors, URLParseError, ValidationError, ValidationErrorHandler,
};
pub use crate::host::Host;
pub use crate::path::Path;
pub use crate::percent_encode::{percent_decode, percent_encode_to_string};
pub use crate::url::{ExcludeFragment, Port, Scheme, URL};
