// Filtered recipe search: filter model, predicate descriptors, translation

pub mod filters;
pub mod predicate;
pub mod translator;

pub use filters::{ContainsTextFilter, ExactTextFilter, RecipeFilters};
pub use predicate::{OrderBy, Predicate, TextField};
pub use translator::{search, RecipeSearchResponse, SearchPlan};

pub const DEFAULT_PAGE_NUMBER: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 100;
pub const MAX_PAGE_SIZE: u32 = 100_000;
