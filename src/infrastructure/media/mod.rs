mod cloudinary_image_service;
mod factory;
mod noop_image_service;

pub use cloudinary_image_service::CloudinaryImageService;
pub use factory::build_image_service;
pub use noop_image_service::NoOpImageService;
