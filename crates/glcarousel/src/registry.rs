use std::collections::HashMap;

use crate::carousel::CarouselError;
use crate::effect::EffectRef;
use crate::transitions;

/// Immutable lookup table from effect names to effect handles.
///
/// Built once through [`RegistryBuilder`]; resolution never falls back to a
/// default effect, an unknown name is a configuration error.
#[derive(Debug, Clone)]
pub struct TransitionRegistry {
    effects: HashMap<String, EffectRef>,
    order: Vec<String>,
}

/// Accumulates effects before freezing them into a [`TransitionRegistry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    effects: Vec<EffectRef>,
}

impl RegistryBuilder {
    /// Adds every effect from the built-in catalog.
    pub fn with_builtins(mut self) -> Self {
        self.effects.extend(transitions::builtin());
        self
    }

    pub fn register(mut self, effect: EffectRef) -> Self {
        self.effects.push(effect);
        self
    }

    /// Freezes the registry, rejecting duplicate names.
    pub fn build(self) -> Result<TransitionRegistry, CarouselError> {
        let mut effects = HashMap::with_capacity(self.effects.len());
        let mut order = Vec::with_capacity(self.effects.len());
        for effect in self.effects {
            let key = normalize_name(effect.name());
            if effects.contains_key(&key) {
                return Err(CarouselError::DuplicateTransition(key));
            }
            order.push(key.clone());
            effects.insert(key, effect);
        }
        Ok(TransitionRegistry { effects, order })
    }
}

impl TransitionRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry holding only the built-in catalog.
    pub fn with_builtins() -> Self {
        let builtin = transitions::builtin();
        let order = builtin
            .iter()
            .map(|effect| normalize_name(effect.name()))
            .collect();
        let effects = builtin
            .into_iter()
            .map(|effect| (normalize_name(effect.name()), effect))
            .collect();
        Self { effects, order }
    }

    pub fn resolve(&self, name: &str) -> Result<EffectRef, CarouselError> {
        let key = normalize_name(name);
        self.effects
            .get(&key)
            .cloned()
            .ok_or_else(|| CarouselError::UnknownTransition(name.trim().to_string()))
    }

    /// Resolves an ordered list of names, failing on the first unknown one.
    pub fn resolve_all<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<EffectRef>, CarouselError> {
        names.iter().map(|name| self.resolve(name.as_ref())).collect()
    }

    /// Registered names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for TransitionRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Canonical lookup key: trimmed, snake_case, so `glitchMemories`,
/// `glitch-memories` and `glitch_memories` all match.
pub fn normalize_name(name: &str) -> String {
    let mut key = String::with_capacity(name.len() + 4);
    for ch in name.trim().chars() {
        if ch.is_ascii_uppercase() {
            if !key.is_empty() && !key.ends_with('_') {
                key.push('_');
            }
            key.push(ch.to_ascii_lowercase());
        } else if ch == '-' || ch.is_whitespace() {
            if !key.ends_with('_') {
                key.push('_');
            }
        } else {
            key.push(ch);
        }
    }
    key
}
