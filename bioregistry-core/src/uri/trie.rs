//! Character trie over URI literal prefixes
//!
//! Unlike a map keyed on whole prefixes, walking the trie once yields every
//! stored prefix of the input, shortest first. Several values may end on the
//! same node.

use std::collections::HashMap;

/// Prefix trie with multi-valued terminals
#[derive(Debug, Clone)]
pub struct UriTrie<T> {
    root: TrieNode<T>,
    len: usize,
}

#[derive(Debug, Clone)]
struct TrieNode<T> {
    children: HashMap<char, TrieNode<T>>,
    values: Vec<T>,
}

impl<T> Default for TrieNode<T> {
    fn default() -> Self {
        Self {
            children: HashMap::new(),
            values: Vec::new(),
        }
    }
}

/// One stored prefix found along the input
#[derive(Debug)]
pub struct TrieMatch<'a, T> {
    /// Byte length of the matched prefix within the input
    pub end: usize,
    /// Values stored under that prefix
    pub values: &'a [T],
}

impl<T> UriTrie<T> {
    pub fn new() -> Self {
        Self {
            root: TrieNode::default(),
            len: 0,
        }
    }

    /// Attach a value to a key, keeping any values already stored there
    pub fn insert(&mut self, key: &str, value: T) {
        let mut node = &mut self.root;
        for ch in key.chars() {
            node = node.children.entry(ch).or_default();
        }
        node.values.push(value);
        self.len += 1;
    }

    /// Every stored prefix of `input`, shortest first
    pub fn prefixes_of<'a>(&'a self, input: &str) -> Vec<TrieMatch<'a, T>> {
        let mut found = Vec::new();
        let mut node = &self.root;

        if !node.values.is_empty() {
            found.push(TrieMatch {
                end: 0,
                values: &node.values,
            });
        }

        for (offset, ch) in input.char_indices() {
            match node.children.get(&ch) {
                Some(child) => node = child,
                None => break,
            }
            if !node.values.is_empty() {
                found.push(TrieMatch {
                    end: offset + ch.len_utf8(),
                    values: &node.values,
                });
            }
        }

        found
    }

    /// Values stored under exactly `key`
    pub fn get(&self, key: &str) -> &[T] {
        let mut node = &self.root;
        for ch in key.chars() {
            match node.children.get(&ch) {
                Some(child) => node = child,
                None => return &[],
            }
        }
        &node.values
    }

    /// Number of stored values
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<T> Default for UriTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collects_every_prefix() {
        let mut trie = UriTrie::new();
        trie.insert("http://purl.obolibrary.org/obo/", "root");
        trie.insert("http://purl.obolibrary.org/obo/GO_", "go");
        trie.insert("http://purl.obolibrary.org/obo/CHEBI_", "chebi");

        let found = trie.prefixes_of("http://purl.obolibrary.org/obo/GO_0006915");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].values, &["root"]);
        assert_eq!(found[1].values, &["go"]);
        assert_eq!(found[1].end, "http://purl.obolibrary.org/obo/GO_".len());
    }

    #[test]
    fn test_shared_terminal() {
        let mut trie = UriTrie::new();
        trie.insert("http://example.org/", "a");
        trie.insert("http://example.org/", "b");

        assert_eq!(trie.get("http://example.org/"), &["a", "b"]);
        assert_eq!(trie.len(), 2);

        let found = trie.prefixes_of("http://example.org/A123");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].values.len(), 2);
    }

    #[test]
    fn test_no_match() {
        let mut trie = UriTrie::new();
        trie.insert("https://identifiers.org/", 1);
        assert!(trie.prefixes_of("http://identifiers.org/").is_empty());
        assert!(trie.get("https://identifiers").is_empty());
    }

    #[test]
    fn test_multibyte_offsets() {
        let mut trie = UriTrie::new();
        trie.insert("http://é.org/", ());
        let found = trie.prefixes_of("http://é.org/x");
        assert_eq!(&"http://é.org/x"[found[0].end..], "x");
    }
}
