//! Domain models
//!
//! - [`repo`]: the normalized desired-state model built by the loader
//! - [`remote`]: the typed current-state snapshot supplied by a fetch layer
//! - [`value`]: the tagged value tree used for free-form config sections
//! - [`kinds`]: small closed vocabularies shared by both sides

pub mod kinds;
pub mod remote;
pub mod repo;
pub mod value;

pub use kinds::{LabelMembership, LoggingMode, PlatformSet};
pub use remote::{
    CatalogApp, RemoteGroup, RemoteLabel, RemotePackage, RemotePolicy, RemoteProfile,
    RemoteQuery, RemoteSnapshot, RemoteSoftware, RemoteStoreApp, RemoteVendorApp,
    SoftwareTitle, TitlePackage, TitleStoreApp,
};
pub use repo::{
    GlobalScope, Group, Label, ParsedRepo, Policy, Profile, Query, Software, SoftwarePackage,
    StoreApp, VendorMaintainedApp,
};
pub use value::{ConfigMap, ConfigValue};
