//! Row-major flattening of `D`-dimensional grid coordinates.

/// Maps grid coordinates `[i, j, ...]` to a flat index and back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index<const D: usize> {
    dims: [usize; D],
    strides: [usize; D],
    size: usize,
}

impl<const D: usize> Default for Index<D> {
    fn default() -> Self {
        Self::new([0; D])
    }
}

impl<const D: usize> Index<D> {
    #[must_use]
    pub fn new(dims: [usize; D]) -> Self {
        let size = dims.iter().product();
        let mut strides = [0; D];
        if D > 0 && size > 0 {
            strides[0] = size / dims[0];
            for d in 1..D {
                strides[d] = strides[d - 1] / dims[d];
            }
        }
        Self { dims, strides, size }
    }

    #[must_use]
    pub fn index(&self, ijk: &[usize; D]) -> usize {
        ijk.iter().zip(self.strides.iter()).map(|(i, s)| i * s).sum()
    }

    /// Inverse of [`Index::index`] for `ix < size()`.
    #[must_use]
    pub fn inverse(&self, mut ix: usize) -> [usize; D] {
        let mut ijk = [0; D];
        for (coord, stride) in ijk.iter_mut().zip(self.strides.iter()) {
            if *stride > 0 {
                *coord = ix / stride;
                ix %= stride;
            }
        }
        ijk
    }

    #[must_use]
    pub const fn dims(&self) -> &[usize; D] {
        &self.dims
    }

    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }
}

impl<const D: usize> std::ops::Index<usize> for Index<D> {
    type Output = usize;

    fn index(&self, d: usize) -> &usize {
        &self.dims[d]
    }
}
