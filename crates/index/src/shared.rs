//! Thread-safe handle over a [`BandingIndex`].

use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use perceptual::Signature;

use crate::banding::BandingParams;
use crate::lsh::{Admission, BandingIndex};
use crate::{IndexConfig, IndexError};

/// Cloneable handle to one index shared between threads.
///
/// Every method takes the lock once, so [`SharedIndex::admit`] is atomic:
/// two threads admitting near-duplicates concurrently see exactly one
/// `Inserted`.
#[derive(Debug)]
pub struct SharedIndex<K = String> {
    inner: Arc<Mutex<BandingIndex<K>>>,
    params: BandingParams,
}

impl<K> Clone for SharedIndex<K> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            params: self.params,
        }
    }
}

impl<K> SharedIndex<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new(index: BandingIndex<K>) -> Self {
        let params = index.params();
        Self {
            inner: Arc::new(Mutex::new(index)),
            params,
        }
    }

    pub fn from_config(cfg: &IndexConfig, num_perm: usize) -> Result<Self, IndexError> {
        Ok(Self::new(BandingIndex::from_config(cfg, num_perm)?))
    }

    pub fn params(&self) -> BandingParams {
        self.params
    }

    pub fn admit(&self, id: K, signature: Signature) -> Result<Admission<K>, IndexError> {
        self.lock()?.admit(id, signature)
    }

    pub fn query(&self, signature: &Signature) -> Result<Option<K>, IndexError> {
        Ok(self.lock()?.query(signature)?.cloned())
    }

    pub fn insert(&self, id: K, signature: Signature) -> Result<bool, IndexError> {
        self.lock()?.insert(id, signature)
    }

    pub fn signature_of(&self, id: &K) -> Result<Option<Signature>, IndexError> {
        Ok(self.lock()?.signature_of(id).cloned())
    }

    pub fn len(&self) -> Result<usize, IndexError> {
        Ok(self.lock()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, IndexError> {
        Ok(self.lock()?.is_empty())
    }

    pub fn clear(&self) -> Result<(), IndexError> {
        self.lock()?.clear();
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, BandingIndex<K>>, IndexError> {
        self.inner.lock().map_err(|_| IndexError::Poisoned)
    }
}
