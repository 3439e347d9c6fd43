use image::GenericImageView;

use crate::errors::Result;
use crate::resources::texture::Texture;

/// Decodes PNG/JPEG bytes into an RGBA8 texture configured as a surface map.
pub fn decode_texture(name: &str, bytes: &[u8]) -> Result<Texture> {
    let img = image::load_from_memory(bytes)?;
    let (width, height) = img.dimensions();
    let data = img.into_rgba8().into_raw();

    Ok(Texture::new(name.to_string(), width, height, data).into_surface_map())
}
