//! Data layer: listing types, loading, faceting, filtering and sorting.
//!
//! Architecture:
//! ```text
//!  .json / .csv / built-in seed
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  loader   │  parse file → Vec<DatasetRecord>
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  Catalog  │  validated, immutable records
//!   └──────────┘
//!        │
//!        ├──────────────┐
//!        ▼              ▼
//!   ┌──────────┐   ┌──────────┐
//!   │  facet    │   │  filter   │  QuerySpec → matching indices
//!   └──────────┘   └──────────┘
//!                       │
//!                       ▼
//!                  ┌──────────┐
//!                  │   sort    │  stable reorder by SortKey
//!                  └──────────┘
//! ```

pub mod facet;
pub mod filter;
pub mod loader;
pub mod model;
pub mod seed;
pub mod sort;
