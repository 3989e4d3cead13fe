//! Proptest generators for property-based testing.

use proptest::prelude::*;

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a chunk size in `1..=max`.
pub fn chunk_size(max: usize) -> impl Strategy<Value = usize> {
    1..=max.max(1)
}

/// Generate up to 16 cut positions in `0..=max_len`, unsorted.
pub fn split_points(max_len: usize) -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0..=max_len, 0..16)
}

/// A payload, a chunk size, and a way of splitting the payload into writes.
#[derive(Debug, Clone)]
pub struct WriteParams {
    pub data: Vec<u8>,
    pub chunk_size: usize,
    pub cuts: Vec<usize>,
}

impl Arbitrary for WriteParams {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (payload(600), chunk_size(70))
            .prop_flat_map(|(data, chunk_size)| {
                let len = data.len();
                (Just(data), Just(chunk_size), split_points(len))
            })
            .prop_map(|(data, chunk_size, cuts)| WriteParams {
                data,
                chunk_size,
                cuts,
            })
            .boxed()
    }
}
