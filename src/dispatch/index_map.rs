//! Round-local to original index mapping.

/// Original location index of every node of one round.
///
/// Position `i` holds the original index of local node `i`; position 0 is
/// always the depot. Each round gets a fresh map derived from the previous
/// one, so no index is ever shared mutably between rounds.
///
/// # Examples
///
/// ```
/// use dispatch_routing::dispatch::IndexMap;
///
/// let first = IndexMap::identity(6);
/// // round 1 dropped local nodes 2 and 5
/// let second = first.restrict(&[2, 5]);
/// assert_eq!(second.originals(), &[0, 2, 5]);
///
/// // round 2 dropped its local node 2, i.e. original 5
/// let third = second.restrict(&[2]);
/// assert_eq!(third.originals(), &[0, 5]);
/// assert_eq!(third.to_original(1), 5);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexMap {
    originals: Vec<usize>,
}

impl IndexMap {
    /// Maps each of `n` nodes to itself.
    pub fn identity(n: usize) -> Self {
        Self {
            originals: (0..n).collect(),
        }
    }

    /// Map of the next round: the depot followed by the given local nodes.
    pub fn restrict(&self, locals: &[usize]) -> Self {
        let mut originals = Vec::with_capacity(locals.len() + 1);
        originals.push(self.originals[0]);
        originals.extend(
            locals
                .iter()
                .filter(|&&l| l != 0)
                .map(|&l| self.originals[l]),
        );
        Self { originals }
    }

    /// Original index of local node `local`.
    #[inline]
    pub fn to_original(&self, local: usize) -> usize {
        self.originals[local]
    }

    /// Maps a local node sequence to original indices.
    pub fn map_route(&self, locals: &[usize]) -> Vec<usize> {
        locals.iter().map(|&l| self.originals[l]).collect()
    }

    /// Original indices, by local position.
    pub fn originals(&self) -> &[usize] {
        &self.originals
    }

    /// Number of nodes in the round, depot included.
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    /// Returns `true` if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }
}
