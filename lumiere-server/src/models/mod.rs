//! Domain models with validation at construction
//!
//! Request bodies deserialize into loose `*Request` structs; handlers convert
//! them into validated types before any query is issued.
//! Invalid input returns ValidationError, not panic.

pub mod award;
pub mod category;
pub mod envelope;
pub mod filters;
pub mod pagination;
pub mod patch;
pub mod photo;
pub mod slug;
pub mod validation;

pub use award::{Award, AwardChanges, CreateAwardRequest, NewAward, UpdateAwardRequest};
pub use category::{Category, CategoryInput, CategoryListParams, CategoryName, CategoryRequest};
pub use envelope::{ApiResponse, ErrorBody, MessageResponse};
pub use filters::{PhotoFilters, PhotoListParams, SortDirection, SortField};
pub use pagination::{Paginated, Pagination};
pub use photo::{
    CreatePhotoRequest, MediaType, NewPhoto, Photo, PhotoChanges, PhotoDetails, PhotoMedia,
    PhotoQuote, PhotoTitle, UpdatePhotoRequest,
};
pub use slug::{slugify, Slug};
pub use validation::ValidationError;
