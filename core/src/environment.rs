//! An environment for storing variables with scopes.
use std::collections::HashMap;
use std::hash::Hash;
use std::iter::FromIterator;
use std::rc::Rc;

/// An environment as a linked-list of hashmaps.
///
/// Each node of the linked-list corresponds to what is called "a layer", or a frame. Layers are
/// never modified once built: [Environment::extend] returns a new environment whose current layer
/// holds the new bindings and whose previous layers are shared with the parent. Extending an
/// environment thus never changes what the parent sees, and is cheap, as previous layers are
/// reference counted.
///
/// For the generic parameters, `K` is the type for the environment keys, and `V` are their value.
#[derive(Debug, PartialEq)]
pub struct Environment<K: Hash + Eq, V: PartialEq> {
    current: Rc<HashMap<K, V>>,
    previous: Option<Rc<Environment<K, V>>>,
}

impl<K: Hash + Eq, V: PartialEq> Clone for Environment<K, V> {
    fn clone(&self) -> Self {
        Environment {
            current: Rc::clone(&self.current),
            previous: self.previous.clone(),
        }
    }
}

impl<K: Hash + Eq, V: PartialEq> Default for Environment<K, V> {
    fn default() -> Self {
        Self {
            current: Rc::new(HashMap::new()),
            previous: None,
        }
    }
}

impl<K: Hash + Eq, V: PartialEq> Environment<K, V> {
    /// Creates a new empty Environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new environment with one more layer holding the given bindings on top of `self`.
    /// If a key occurs several times in `bindings`, the last occurrence wins.
    pub fn extend<I>(&self, bindings: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Environment {
            current: Rc::new(HashMap::from_iter(bindings)),
            previous: Some(Rc::new(self.clone())),
        }
    }

    /// Tries to find the value of a key in the Environment, from the innermost layer to the
    /// outermost one.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.iter_layers().find_map(|hmap| hmap.get(key))
    }

    /// Creates an iterator that visits all layers from the most recent one to the oldest.
    pub fn iter_layers(&self) -> EnvLayerIter<'_, K, V> {
        EnvLayerIter { env: Some(self) }
    }

    /// Creates an iterator over all the visible bindings: if a key is present in several layers,
    /// only the most recent one appears. The order of iteration is unspecified.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        let mut collapsed: HashMap<&K, &V> = HashMap::new();

        for layer in self.iter_layers() {
            for (key, value) in layer.iter() {
                collapsed.entry(key).or_insert(value);
            }
        }

        collapsed.into_iter()
    }
}

impl<K: Hash + Eq, V: PartialEq> FromIterator<(K, V)> for Environment<K, V> {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            current: Rc::new(HashMap::from_iter(iter)),
            previous: None,
        }
    }
}

/// An iterator over the layers of `Environment`.
///
/// Created by the [`iter_layers`] method on [`Environment`].
///
/// [`iter_layers`]: Environment::iter_layers
pub struct EnvLayerIter<'a, K: Hash + Eq, V: PartialEq> {
    env: Option<&'a Environment<K, V>>,
}

impl<'a, K: Hash + Eq, V: PartialEq> Iterator for EnvLayerIter<'a, K, V> {
    type Item = &'a HashMap<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let env = self.env.take()?;
        self.env = env.previous.as_deref();
        Some(&env.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_base() {
        let env = Environment::<u8, char>::new();
        assert_eq!(env.get(&1), None);
        assert_eq!(env.iter_layers().count(), 1);

        let env = env.extend([(1, 'a'), (2, 'b')]);
        assert_eq!(env.get(&1), Some(&'a'));
        assert_eq!(env.get(&2), Some(&'b'));
        assert_eq!(env.get(&3), None);
    }

    #[test]
    fn test_env_shadowing() {
        let outer: Environment<&str, u32> = [("x", 1), ("y", 2)].into_iter().collect();
        let inner = outer.extend([("x", 10)]);

        assert_eq!(inner.get(&"x"), Some(&10));
        assert_eq!(inner.get(&"y"), Some(&2));
        // The parent is left untouched.
        assert_eq!(outer.get(&"x"), Some(&1));
        assert_eq!(inner.iter_layers().count(), 2);
    }

    #[test]
    fn test_env_sibling_frames() {
        let parent: Environment<&str, u32> = [("x", 1)].into_iter().collect();
        let left = parent.extend([("l", 2)]);
        let right = parent.extend([("r", 3)]);

        assert_eq!(left.get(&"r"), None);
        assert_eq!(right.get(&"l"), None);
        assert_eq!(left.get(&"x"), Some(&1));
        assert_eq!(right.get(&"x"), Some(&1));
    }

    #[test]
    fn test_iter_layers() {
        let env: Environment<u8, u8> = [(1, 1)].into_iter().collect();
        let env = env.extend([(2, 2)]).extend([(3, 3)]);

        let keys: Vec<Vec<u8>> = env
            .iter_layers()
            .map(|layer| layer.keys().copied().collect())
            .collect();
        assert_eq!(keys, vec![vec![3], vec![2], vec![1]]);
    }

    #[test]
    fn test_iter_collapses_shadowed() {
        let env: Environment<u8, char> = [(1, 'a'), (2, 'b')].into_iter().collect();
        let env = env.extend([(1, 'c')]);

        let mut elems: Vec<_> = env.iter().map(|(k, v)| (*k, *v)).collect();
        elems.sort();
        assert_eq!(elems, vec![(1, 'c'), (2, 'b')]);
    }
}
