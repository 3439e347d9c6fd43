pub mod gltf;
pub mod image;

pub use self::gltf::GltfLoader;
pub use self::image::decode_texture;
