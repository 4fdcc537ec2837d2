//! Ordered provider collection.

use tracing::debug;

use crate::parser::Identifier;

use super::Provider;

/// Providers in consultation order.
pub struct ProviderRegistry {
    providers: Vec<Box<dyn Provider>>,
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Appends a provider; later providers are consulted later.
    #[tracing::instrument(skip(self, provider), fields(provider_name))]
    pub fn register(&mut self, provider: Box<dyn Provider>) {
        tracing::Span::current().record("provider_name", provider.name());
        debug!(name = provider.name(), "Registering provider");
        self.providers.push(provider);
    }

    /// Returns the number of registered providers.
    #[must_use]
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no providers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Iterates over every registered provider in order.
    pub fn providers(&self) -> impl Iterator<Item = &dyn Provider> {
        self.providers.iter().map(AsRef::as_ref)
    }

    /// Returns the providers that accept `identifier`, in registration order.
    #[must_use]
    pub fn find_handlers(&self, identifier: &Identifier) -> Vec<&dyn Provider> {
        self.providers()
            .filter(|p| p.can_handle(identifier))
            .collect()
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field(
                "providers",
                &self.providers().map(Provider::name).collect::<Vec<_>>(),
            )
            .finish()
    }
}
