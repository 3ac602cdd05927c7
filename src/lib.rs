pub mod config;
pub mod error;
pub mod graph;
pub mod init;
pub mod license;
pub mod manifest;
pub mod output;
pub mod report;

// Re-export main types for easy access
pub use error::{GraphError, LocalLicenseError, RemoteLicenseError};
pub use graph::{CommandGraphSource, GraphSource, ModuleGraph};
pub use license::{LicenseRecords, LicenseResolver, LicenseSource, ResolvedLicense};
pub use report::{LicenseEntry, LicenseReport};
