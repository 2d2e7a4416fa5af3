//! Registry Store & Synonym Index
//!
//! The store holds one immutable record per canonical prefix. The synonym
//! index maps every alias, preferred prefix and casing variant to exactly one
//! canonical prefix.
//!
//! ```text
//!   "NCBITaxon"  "taxonomy"  " ncbitaxon "
//!        │            │            │
//!        └──── fold (trim + lowercase) ───┐
//!                                         ▼
//!                  canonical map ──► synonym map ──► None
//!                        │                │
//!                        └──── "ncbitaxon" ◄┘
//! ```

mod store;
mod synonyms;

pub use store::RegistryStore;
pub use synonyms::{fold, Collision, SynonymIndex};
