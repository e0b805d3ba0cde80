//! Common types, protocol definitions, and errors shared across `textseal` crates.

pub mod error;
pub mod protocol;

pub use error::ServiceError;
pub use protocol::{
    JsonSelfTestReport, KeyInfo, ReadyReport, ResultEnvelope, SecureDataReply, SelfTestReport,
};
