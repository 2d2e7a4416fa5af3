//! URI templates and the reverse provider index

mod index;
mod template;
mod trie;

pub use index::{Candidate, ProviderEntry, ProviderIndex};
pub use template::{normalize_scheme, placeholder_count, UriTemplate};
pub use trie::{TrieMatch, UriTrie};
