//! Process-wide cache of constructed language profiles.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::language::data::{LocaleSpec, builtin_specs};
use crate::language::profile::LanguageProfile;

/// Lazily-constructed, compute-once-per-key cache of [`LanguageProfile`]s.
///
/// The cache is explicit, injectable state with a defined lifecycle rather
/// than an ambient global: construct one, share it (it is `Send + Sync`),
/// and [`clear`](ProfileCache::clear) it in tests. The lock is held only
/// while looking up or constructing a profile, never across an evaluation.
///
/// Locale data that must be fetched from an external source goes through
/// [`get_or_insert_with`](ProfileCache::get_or_insert_with): a fetch that
/// fails (or is cancelled) leaves the key unpopulated, so callers can
/// retry.
pub struct ProfileCache {
    inner: Mutex<CacheInner>,
}

struct CacheInner {
    specs: HashMap<String, LocaleSpec>,
    profiles: HashMap<String, Arc<LanguageProfile>>,
}

impl ProfileCache {
    /// A cache seeded with the built-in locale specs.
    pub fn new() -> ProfileCache {
        let mut specs = HashMap::new();
        for spec in builtin_specs() {
            specs.insert(spec.locale.clone(), spec);
        }
        ProfileCache {
            inner: Mutex::new(CacheInner {
                specs,
                profiles: HashMap::new(),
            }),
        }
    }

    /// A cache with no locale data at all; every locale resolves to the
    /// English-like fallback until specs are registered.
    pub fn empty() -> ProfileCache {
        ProfileCache {
            inner: Mutex::new(CacheInner {
                specs: HashMap::new(),
                profiles: HashMap::new(),
            }),
        }
    }

    /// Register (or replace) a locale spec. Any previously constructed
    /// profile for that locale is discarded so the next lookup rebuilds
    /// from the new data.
    pub fn register(&self, spec: LocaleSpec) {
        let mut inner = self.inner.lock().expect("profile cache poisoned");
        inner.profiles.remove(&spec.locale);
        inner.specs.insert(spec.locale.clone(), spec);
    }

    /// Get the profile for a locale, constructing it on first access.
    ///
    /// A locale with no registered spec resolves to the English-like
    /// fallback profile (cached under that locale code).
    pub fn get(&self, locale: &str) -> Arc<LanguageProfile> {
        let mut inner = self.inner.lock().expect("profile cache poisoned");
        if let Some(profile) = inner.profiles.get(locale) {
            return Arc::clone(profile);
        }
        let profile = match inner.specs.get(locale) {
            Some(spec) => Arc::new(LanguageProfile::from_spec(spec)),
            None => Arc::new(LanguageProfile::fallback(locale)),
        };
        inner
            .profiles
            .insert(locale.to_string(), Arc::clone(&profile));
        profile
    }

    /// Get the profile for a locale, fetching its spec through `fetch` on
    /// first access.
    ///
    /// `fetch` models an external locale-data load the caller has already
    /// awaited or is running synchronously; if it returns `Err`, nothing is
    /// cached for the key and the error is passed through, leaving the
    /// caller free to retry later.
    pub fn get_or_insert_with<E>(
        &self,
        locale: &str,
        fetch: impl FnOnce() -> Result<LocaleSpec, E>,
    ) -> Result<Arc<LanguageProfile>, E> {
        {
            let inner = self.inner.lock().expect("profile cache poisoned");
            if let Some(profile) = inner.profiles.get(locale) {
                return Ok(Arc::clone(profile));
            }
        }
        // Fetch outside the lock; an error leaves the key unpopulated.
        let spec = fetch()?;
        let profile = Arc::new(LanguageProfile::from_spec(&spec));
        let mut inner = self.inner.lock().expect("profile cache poisoned");
        inner.specs.insert(locale.to_string(), spec);
        let entry = inner
            .profiles
            .entry(locale.to_string())
            .or_insert_with(|| Arc::clone(&profile));
        Ok(Arc::clone(entry))
    }

    /// Whether a profile has been constructed for this locale.
    pub fn is_populated(&self, locale: &str) -> bool {
        let inner = self.inner.lock().expect("profile cache poisoned");
        inner.profiles.contains_key(locale)
    }

    /// Drop all constructed profiles (registered specs are kept).
    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("profile cache poisoned");
        inner.profiles.clear();
    }
}

impl Default for ProfileCache {
    fn default() -> Self {
        ProfileCache::new()
    }
}
