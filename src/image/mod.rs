pub mod f32;
pub mod io;
pub mod stats;
pub mod traits;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::traits::{ImageView, ImageViewMut};
pub use self::u8::ImageU8;

/// Working image value passed between pipeline collaborators.
pub type ImageData = ImageF32;
