//! Per-episode voice resolution.

use super::{Gender, VoiceCatalog, VoiceDescriptor, VoiceSelection};
use crate::error::{KringkastError, Result};
use crate::script::Role;
use rand::seq::SliceRandom;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Resolves concrete voices for episode roles.
///
/// One registry instance serves one episode: the first resolution per role
/// is memoized so every turn by that role reuses the same descriptor, and
/// `reset` clears the bindings before the next episode. Concurrent episodes
/// each get their own registry over the shared read-only catalog.
pub struct VoiceRegistry {
    catalog: Arc<VoiceCatalog>,
    default_language: String,
    assignments: HashMap<Role, VoiceDescriptor>,
}

impl VoiceRegistry {
    pub fn new(catalog: Arc<VoiceCatalog>, default_language: &str) -> Self {
        Self {
            catalog,
            default_language: default_language.to_string(),
            assignments: HashMap::new(),
        }
    }

    /// Resolve the voice for a role, memoizing the first resolution.
    ///
    /// A concrete id is honored verbatim when it exists in the catalog; a
    /// missing id degrades to a random pick rather than failing. Gender and
    /// random selections avoid descriptors already claimed by other roles
    /// whenever an unclaimed candidate exists.
    pub fn resolve(
        &mut self,
        role: Role,
        language: &str,
        selection: &VoiceSelection,
    ) -> Result<VoiceDescriptor> {
        if let Some(existing) = self.assignments.get(&role) {
            return Ok(existing.clone());
        }

        let descriptor = match selection {
            VoiceSelection::Id(id) => match self.lookup_id(language, id) {
                Some(voice) => voice,
                None => {
                    warn!(
                        "Voice id '{}' not found for {}; substituting a random voice",
                        id, language
                    );
                    self.pick(language, Gender::pick_random())?
                }
            },
            VoiceSelection::Gender(gender) => self.pick(language, *gender)?,
            VoiceSelection::Random => self.pick(language, Gender::pick_random())?,
        };

        info!(
            "Assigned voice {} ({}) to the {} role",
            descriptor.id, descriptor.gender, role
        );
        self.assignments.insert(role, descriptor.clone());
        Ok(descriptor)
    }

    /// The voice currently bound to a role, if any.
    pub fn assignment(&self, role: Role) -> Option<&VoiceDescriptor> {
        self.assignments.get(&role)
    }

    /// Clear all role bindings for the next episode.
    pub fn reset(&mut self) {
        self.assignments.clear();
    }

    fn lookup_id(&self, language: &str, id: &str) -> Option<VoiceDescriptor> {
        self.catalog
            .by_id(language, id)
            .or_else(|| self.catalog.by_id(&self.default_language, id))
    }

    /// Random pick of the requested gender, preferring unclaimed voices.
    /// Falls back through the default language and finally any gender
    /// before giving up.
    fn pick(&self, language: &str, gender: Gender) -> Result<VoiceDescriptor> {
        let mut candidates = self.catalog.by_gender(language, gender);
        if candidates.is_empty() {
            candidates = self.catalog.by_gender(&self.default_language, gender);
        }
        if candidates.is_empty() {
            candidates = self.catalog.load(language);
        }
        if candidates.is_empty() {
            candidates = self.catalog.load(&self.default_language);
        }
        if candidates.is_empty() {
            return Err(KringkastError::VoiceCatalog(format!(
                "No voices available for language '{}' (provider '{}')",
                language,
                self.catalog.provider()
            )));
        }

        let claimed: HashSet<&str> = self.assignments.values().map(|v| v.id.as_str()).collect();
        let unclaimed: Vec<VoiceDescriptor> = candidates
            .iter()
            .filter(|v| !claimed.contains(v.id.as_str()))
            .cloned()
            .collect();

        let pool = if unclaimed.is_empty() {
            &candidates
        } else {
            &unclaimed
        };

        pool.choose(&mut rand::thread_rng())
            .cloned()
            .ok_or_else(|| KringkastError::VoiceCatalog("Empty candidate pool".to_string()))
    }
}
