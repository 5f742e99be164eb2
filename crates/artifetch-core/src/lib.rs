//! Artifetch Core - Core types shared by the artifetch crates
//!
//! This crate provides the foundational types used throughout artifetch:
//! - `Artifact`: What a caller asks for (type, name, version, reference)
//! - `AccountDefinition`: One configured repository endpoint and its provider type
//! - `ProviderType`: Identifier of a credentials provider (`helm`, `bitbucket`, ...)
//! - `ArtifactsConfig`: The declarative account configuration file

pub mod account;
pub mod artifact;
pub mod config;
pub mod error;

pub use account::{AccountAuth, AccountDefinition, ProviderType};
pub use artifact::Artifact;
pub use config::{AccountEntry, ArtifactsConfig, HttpConfig, ProviderSection};
pub use error::{CoreError, Result};
