//! Asset dispatch: deciding per entry what to minify and where it goes.

mod descriptor;
pub mod dispatch;
mod error;
mod kind;
pub mod minify;
mod page;
pub mod resolve;
pub mod target;

// Types
pub use descriptor::{AssetCollection, AssetDescriptor, AssetSource};
pub use error::{EntryError, MinifyError};
pub use kind::{AssetType, KeyPolicy};
pub use page::{CollectorAssets, PageAssets};

// Orchestration
pub use dispatch::{AssetMinifier, Dispatch, Minified, MinifyOptions};

// Collaborators
pub use minify::{LightningCssMinifier, Minify, OxcMinifier, Passthrough};
pub use resolve::{ResolvePath, SiteResolver};
