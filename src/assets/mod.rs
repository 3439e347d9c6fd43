//! Asset loading and the part registry.
//!
//! Loading is the only asynchronous work: [`AssetLoader`] fetches bytes via an
//! [`AssetReader`], decodes them into plain [`PartAsset`]s and [`Texture`]s,
//! and returns a [`LoadBatch`] once every request has settled. The composer
//! then ingests the batch into its [`AssetRegistry`].
//!
//! [`Texture`]: crate::resources::Texture

pub mod io;
pub mod loaders;
pub mod part;
pub mod registry;
pub mod server;

pub use io::{AssetReader, FileAssetReader, MemoryAssetReader, logical_name};
pub use loaders::GltfLoader;
pub use part::{PartAsset, PartMesh, PartNode, PartSkeleton};
pub use registry::{AssetRegistry, Part, PartOrigin};
pub use server::{AssetLoader, AssetManifest, LoadBatch, LoadOutcome, LoadProgress, LoadedAsset};
