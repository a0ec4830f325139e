//! WISEBox scan log reader library.
//!
//! WISEBox devices write periodic Wi-Fi signal strength scans into binary
//! log files named `wp<YYYYMMDDHHMMSS>.<status>`. This crate decodes them:
//!
//! - `record`: decoded value types (`Header`, `Entry`) and the `Revision`
//!   selector for the three wire layouts seen in the field
//! - `header` / `entries`: the two decoders, driven by a byte `cursor`
//! - `codec`: [`decode`], the single entry point for one in-memory file
//! - `catalog`: locating capture files in a log directory and loading them
//!
//! The `wisebox_log` binary (`src/main.rs`) lists, shows and checks the
//! captures of a log directory on top of these modules.
pub mod catalog;
pub mod codec;
pub mod cursor;
pub mod entries;
pub mod error;
pub mod header;
pub mod record;

pub use codec::decode;
pub use entries::decode_entries;
pub use error::DecodeError;
pub use header::decode_header;
pub use record::{Entry, Header, MacAddress, Revision};
