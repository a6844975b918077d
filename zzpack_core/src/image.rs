use crate::compression::Compression;
use crate::error::ImageError;

/// Indexed-color image with an optional transform (mask) layer.
///
/// The image layer holds one palette index per pixel. The transform layer,
/// when present, holds one extra byte per pixel with the same dimensions.
/// A single-layer image has no transform storage at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    width: i32,
    height: i32,
    image: Vec<u8>,
    transform: Vec<u8>,
    single_layer: bool,
}

impl Image {
    /// Zero-filled image with both layers.
    pub fn new(width: i32, height: i32) -> Self {
        let mut image = Self::default();
        image.resize(width, height);
        image
    }

    /// Zero-filled image without a transform layer.
    pub fn single_layer(width: i32, height: i32) -> Self {
        let mut image = Self::default();
        image.disable_transform_layer();
        image.resize(width, height);
        image
    }

    /// Reallocate both layers for the new dimensions, zero-filled.
    ///
    /// Non-positive dimensions leave the image empty.
    pub fn resize(&mut self, width: i32, height: i32) {
        if width <= 0 || height <= 0 {
            self.clear();
            return;
        }

        let size = width as usize * height as usize;
        self.width = width;
        self.height = height;
        self.image = vec![0; size];
        self.transform = if self.single_layer { Vec::new() } else { vec![0; size] };
    }

    /// Drop the transform layer. Later resizes allocate the image layer only.
    pub fn disable_transform_layer(&mut self) {
        self.single_layer = true;
        self.transform = Vec::new();
    }

    pub fn clear(&mut self) {
        self.width = 0;
        self.height = 0;
        self.image = Vec::new();
        self.transform = Vec::new();
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }

    pub fn is_single_layer(&self) -> bool {
        self.single_layer
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    /// The transform layer, or `None` for single-layer images.
    pub fn transform(&self) -> Option<&[u8]> {
        if self.single_layer {
            None
        } else {
            Some(&self.transform)
        }
    }

    pub fn transform_mut(&mut self) -> Option<&mut [u8]> {
        if self.single_layer {
            None
        } else {
            Some(&mut self.transform)
        }
    }
}

impl Compression {
    /// Decode a compressed raw image of `width` x `height` pixels.
    ///
    /// With `double_layer` the decompressed data is two equal blocks: image
    /// layer first, transform layer second. Otherwise it is the image layer
    /// alone and the result has no transform layer.
    pub fn decode_image(&self, width: i32, height: i32, data: &[u8], double_layer: bool) -> Result<Image, ImageError> {
        if data.is_empty() || width <= 0 || height <= 0 {
            return Err(ImageError::InvalidInput {
                width,
                height,
                len: data.len(),
            });
        }

        // No size hint: the compressed length says nothing useful about the layers.
        let raw = self.decompress(data, 0)?;
        if double_layer && raw.len() % 2 == 1 {
            return Err(ImageError::OddLayerSize(raw.len()));
        }

        let layer_size = if double_layer { raw.len() / 2 } else { raw.len() };
        if (width as usize).checked_mul(height as usize) != Some(layer_size) {
            return Err(ImageError::SizeMismatch {
                width,
                height,
                layer_size,
            });
        }

        let mut out = Image::default();
        if !double_layer {
            out.disable_transform_layer();
        }
        out.resize(width, height);

        let (image, transform) = raw.split_at(layer_size);
        out.image_mut().copy_from_slice(image);
        if let Some(layer) = out.transform_mut() {
            layer.copy_from_slice(transform);
        }
        Ok(out)
    }

    /// Compress an image into the layout [`decode_image`](Self::decode_image)
    /// reads: the image layer, followed by the transform layer if present.
    pub fn encode_image(&self, image: &Image) -> Result<Vec<u8>, ImageError> {
        if image.is_empty() {
            return Err(ImageError::InvalidInput {
                width: image.width(),
                height: image.height(),
                len: 0,
            });
        }

        let raw = match image.transform() {
            Some(transform) => [image.image(), transform].concat(),
            None => image.image().to_vec(),
        };
        Ok(self.compress(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::compression::tests::CopyCodec;

    fn adapter() -> Compression {
        Compression::new(Arc::new(CopyCodec::default()))
    }

    #[test]
    fn single_layer_has_no_transform() {
        let image = Image::single_layer(3, 2);
        assert_eq!(image.image().len(), 6);
        assert!(image.transform().is_none());
        assert!(image.is_single_layer());
    }

    #[test]
    fn resize_keeps_layer_mode() {
        let mut image = Image::new(2, 2);
        assert_eq!(image.transform().map(<[u8]>::len), Some(4));
        image.disable_transform_layer();
        image.resize(5, 5);
        assert_eq!(image.image().len(), 25);
        assert!(image.transform().is_none());
    }

    #[test]
    fn non_positive_dimensions_leave_image_empty() {
        assert!(Image::new(0, 5).is_empty());
        assert!(Image::new(4, -1).is_empty());
    }

    #[test]
    fn decode_single_layer_exact_size() {
        let pixels: Vec<u8> = (1..=8).collect();
        let image = adapter().decode_image(4, 2, &pixels, false).unwrap();
        assert_eq!(image.width(), 4);
        assert_eq!(image.height(), 2);
        assert_eq!(image.image(), pixels.as_slice());
        assert!(image.transform().is_none());
    }

    #[test]
    fn decode_rejects_wrong_size() {
        let c = adapter();
        assert!(matches!(
            c.decode_image(4, 2, &[0u8; 7], false),
            Err(ImageError::SizeMismatch { layer_size: 7, .. })
        ));
        assert!(matches!(
            c.decode_image(4, 2, &[0u8; 9], false),
            Err(ImageError::SizeMismatch { layer_size: 9, .. })
        ));
    }

    #[test]
    fn decode_dual_layer_splits_halves() {
        let mut data = vec![1u8; 6];
        data.extend_from_slice(&[2u8; 6]);
        let image = adapter().decode_image(3, 2, &data, true).unwrap();
        assert_eq!(image.image(), &[1u8; 6]);
        assert_eq!(image.transform(), Some(&[2u8; 6][..]));
    }

    #[test]
    fn decode_dual_layer_rejects_odd_length() {
        assert_eq!(
            adapter().decode_image(3, 2, &[0u8; 13], true),
            Err(ImageError::OddLayerSize(13))
        );
    }

    #[test]
    fn decode_rejects_invalid_input() {
        let c = adapter();
        assert!(matches!(c.decode_image(4, 2, &[], false), Err(ImageError::InvalidInput { .. })));
        assert!(matches!(c.decode_image(0, 2, &[0u8; 8], false), Err(ImageError::InvalidInput { .. })));
        assert!(matches!(c.decode_image(4, -2, &[0u8; 8], false), Err(ImageError::InvalidInput { .. })));
    }

    #[test]
    fn encode_then_decode_dual_layer() {
        let c = adapter();
        let mut image = Image::new(2, 3);
        image.image_mut().copy_from_slice(&[1, 2, 3, 4, 5, 6]);
        if let Some(transform) = image.transform_mut() {
            transform.copy_from_slice(&[0, 1, 0, 1, 0, 1]);
        }

        let data = c.encode_image(&image).unwrap();
        assert_eq!(data.len(), 12);
        assert_eq!(c.decode_image(2, 3, &data, true).unwrap(), image);
    }

    #[test]
    fn encode_empty_image_fails() {
        assert!(matches!(
            adapter().encode_image(&Image::default()),
            Err(ImageError::InvalidInput { .. })
        ));
    }
}
