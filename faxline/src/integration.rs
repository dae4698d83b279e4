//! Integration with the [image] crate.

use crate::Bitmap;
use ::image::{GrayImage, Luma};

impl Bitmap {
    /// Convert the bitmap into an 8-bit grayscale image with black pixels
    /// mapped to 0 and white pixels to 255.
    pub fn to_luma8(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            Luma([if self.pixel(x, y) { 0 } else { 255 }])
        })
    }
}

impl From<&Bitmap> for GrayImage {
    fn from(bitmap: &Bitmap) -> Self {
        bitmap.to_luma8()
    }
}
