//! Ports - capability interfaces consumed by the domain.
//!
//! The domain depends only on these traits; adapters provide the real
//! implementations (and mocks for tests).

mod commerce;
mod generative_ai;

pub use commerce::{
    Commerce, CommerceError, CreatedProduct, PlacedImage, Placeholder, PrintArea, PrintProvider,
    ProductDraft, UploadedAsset,
};
pub use generative_ai::{AiError, GenerativeAi};
