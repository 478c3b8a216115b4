use crate::error::ImageError;

/// Image size in pixels
///
/// A struct to represent the spatial size of an image in pixels.
///
/// # Examples
///
/// ```
/// use imstack_image::ImageSize;
///
/// let image_size = ImageSize {
///   width: 10,
///   height: 20,
/// };
///
/// assert_eq!(image_size.width, 10);
/// assert_eq!(image_size.height, 20);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    /// Width of the image in pixels
    pub width: usize,
    /// Height of the image in pixels
    pub height: usize,
}

impl std::fmt::Display for ImageSize {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "ImageSize {{ width: {}, height: {} }}",
            self.width, self.height
        )
    }
}

/// The (N, H, W, C) view of a stack with shape `(..., H, W, C)`.
///
/// All leading axes are folded into `batch`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StackDims {
    /// Number of images in the stack (product of the leading axes).
    pub batch: usize,
    /// Height of each image.
    pub height: usize,
    /// Width of each image.
    pub width: usize,
    /// Number of channels of each image.
    pub channels: usize,
}

impl StackDims {
    /// The spatial size of each image.
    pub fn size(&self) -> ImageSize {
        ImageSize {
            width: self.width,
            height: self.height,
        }
    }

    /// Number of samples in one image row.
    pub fn row_len(&self) -> usize {
        self.width * self.channels
    }

    /// Number of samples in one image.
    pub fn image_len(&self) -> usize {
        self.height * self.row_len()
    }

    /// Number of spatial positions across the whole stack.
    pub fn num_pixels(&self) -> usize {
        self.batch * self.height * self.width
    }
}

/// A row-major n-dimensional array of samples.
///
/// Image operations expect the layout `(H, W, C)` or `(N..., H, W, C)` and
/// check it through [`ImageStack::dims`]. The container itself accepts any
/// rank so callers get a proper error instead of a panic on a malformed input.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageStack<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

impl<T> ImageStack<T> {
    /// Create a new stack from a shape and row-major data.
    ///
    /// # Arguments
    ///
    /// * `shape` - The shape of the stack, channel axis last.
    /// * `data` - The samples in row-major order.
    ///
    /// # Errors
    ///
    /// If the length of the data does not match the shape, an error is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use imstack_image::ImageStack;
    ///
    /// let stack = ImageStack::new([2, 3, 1], vec![0f32; 6]).unwrap();
    ///
    /// assert_eq!(stack.shape(), &[2, 3, 1]);
    /// assert_eq!(stack.dims().unwrap().width, 3);
    /// ```
    pub fn new(shape: impl Into<Vec<usize>>, data: Vec<T>) -> Result<Self, ImageError> {
        let shape = shape.into();
        let numel = shape.iter().product::<usize>();
        if data.len() != numel {
            return Err(ImageError::InvalidChannelShape(data.len(), numel));
        }
        Ok(Self { shape, data })
    }

    /// Create a new stack filled with a single value.
    pub fn from_shape_val(shape: impl Into<Vec<usize>>, val: T) -> Self
    where
        T: Clone,
    {
        let shape = shape.into();
        let numel = shape.iter().product::<usize>();
        Self {
            data: vec![val; numel],
            shape,
        }
    }

    /// Create a single `(H, W, C)` image from its size and interleaved data.
    pub fn from_image(size: ImageSize, channels: usize, data: Vec<T>) -> Result<Self, ImageError> {
        Self::new([size.height, size.width, channels], data)
    }

    /// The shape of the stack.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// The number of axes.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Whether the stack holds no samples.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Interpret the shape as `(N, H, W, C)`.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::InvalidShape`] when the stack has fewer than 3 axes
    /// or an empty channel axis.
    pub fn dims(&self) -> Result<StackDims, ImageError> {
        let ndim = self.shape.len();
        if ndim < 3 || self.shape[ndim - 1] == 0 {
            return Err(ImageError::InvalidShape(self.shape.clone()));
        }
        Ok(StackDims {
            batch: self.shape[..ndim - 3].iter().product(),
            height: self.shape[ndim - 3],
            width: self.shape[ndim - 2],
            channels: self.shape[ndim - 1],
        })
    }

    /// The samples in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// The samples in row-major order, mutable.
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut offset = 0;
        for (&i, &dim) in index.iter().zip(self.shape.iter()) {
            if i >= dim {
                return None;
            }
            offset = offset * dim + i;
        }
        Some(offset)
    }

    /// Get a reference to the sample at the given index, if in bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use imstack_image::ImageStack;
    ///
    /// let stack = ImageStack::new([1, 2, 2], vec![1u8, 2, 3, 4]).unwrap();
    ///
    /// assert_eq!(stack.get(&[0, 1, 0]), Some(&3));
    /// assert_eq!(stack.get(&[0, 2, 0]), None);
    /// ```
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        self.offset(index).map(|o| &self.data[o])
    }

    /// Get a mutable reference to the sample at the given index, if in bounds.
    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut T> {
        self.offset(index).map(move |o| &mut self.data[o])
    }

    /// Apply a function to every sample, producing a stack of the same shape.
    pub fn map<U>(&self, f: impl Fn(&T) -> U) -> ImageStack<U> {
        ImageStack {
            shape: self.shape.clone(),
            data: self.data.iter().map(f).collect(),
        }
    }

    /// Extract a single channel, keeping it as a trailing axis of length 1.
    ///
    /// # Errors
    ///
    /// If the stack is not `(..., H, W, C)` or the channel index is out of
    /// bounds, an error is returned.
    pub fn channel(&self, channel: usize) -> Result<ImageStack<T>, ImageError>
    where
        T: Copy,
    {
        let dims = self.dims()?;
        if channel >= dims.channels {
            return Err(ImageError::ChannelIndexOutOfBounds(channel, dims.channels));
        }

        let data = self
            .data
            .chunks_exact(dims.channels)
            .map(|pixel| pixel[channel])
            .collect();

        let mut shape = self.shape.clone();
        if let Some(last) = shape.last_mut() {
            *last = 1;
        }
        Ok(ImageStack { shape, data })
    }
}
