//! Backup storage adapters.

mod s3_signer;

pub use s3_signer::{MAX_PRESIGN_EXPIRY, S3UrlSigner, validate_expiry};
