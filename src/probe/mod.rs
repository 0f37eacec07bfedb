//! Container inspection and path validation module

pub mod inspector;
pub mod report;
pub mod validator;

pub use inspector::ContainerInspector;
pub use report::{ReportParser, SampleRate};
pub use validator::{OutputState, PathValidator};
