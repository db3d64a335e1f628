//! Formula resolution engine and dependency audit

pub mod audit;
pub mod resolver;

pub use audit::{audit, AuditNode};
pub use resolver::{resolve, Resolution, Step};
