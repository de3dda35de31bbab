/// Input validation failures of the slice-based entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum Poly1305Error {
    #[error("poly1305: invalid key size {len}, expected 32 bytes")]
    InvalidKeySize { len: usize },

    #[error("poly1305: invalid tag size {len}, expected 16 bytes")]
    InvalidTagSize { len: usize },
}
