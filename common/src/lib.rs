pub mod buffer3;
pub mod cancel;
pub mod config;
pub mod log_setup;
pub mod scoped_ref;
pub mod test_utils;

pub use buffer3::Buffer3;
pub use cancel::{CancelSource, CancelToken, NeverCancel};
pub use config::{ConfigError, ConfigResult};
pub use scoped_ref::Scoped;
