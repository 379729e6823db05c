pub mod api;
pub mod attachment;
pub mod base64_blobs;
pub mod config;
pub mod content_range;
pub mod graphql;
pub mod id;
mod key;
pub mod key_pair;
pub mod monday;
pub mod order;
pub mod private_key;
pub mod public_key;
pub mod secp256k1;
pub mod storage;
pub mod submit;
pub mod upload;
pub mod vault;
pub mod webauthn;
