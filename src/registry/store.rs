//! Singleton registry: instantiation and dependency wiring.
//!
//! # Responsibilities
//! - Match scanned units against the definition table
//! - Construct each matched component through its zero-argument constructor
//! - Bind singletons under derived names, aliases, and interface names
//! - Run the wiring pass once every singleton exists
//!
//! # Design Decisions
//! - One construction failure skips that component, never the whole pass
//! - Duplicate binding names abort initialization with both parties named
//! - Immutable after wiring; concurrent lookups need no locking

use std::any::Any;
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use thiserror::Error;

use crate::registry::component::Component;
use crate::registry::definition::{ComponentDefinition, Constructed, Role};
use crate::registry::naming;

/// How a binding name came to exist, kept for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    DerivedName,
    Alias,
    Interface,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("binding name `{name}` already taken by {existing} (while registering {incoming})")]
    DuplicateName {
        name: String,
        existing: &'static str,
        incoming: &'static str,
    },
}

/// A singleton the registry owns for the process lifetime.
pub(crate) struct ManagedComponent {
    pub(crate) definition: &'static ComponentDefinition,
    pub(crate) instance: Arc<dyn Component>,
}

struct Binding {
    /// Simple name of the concrete type that produced this binding.
    owner: &'static str,
    kind: BindingKind,
    /// `Arc<Concrete>` or `Arc<dyn Trait>`, type-erased for lookup.
    handle: Box<dyn Any + Send + Sync>,
}

/// The container's singleton map.
///
/// Built once during initialization and read-only afterwards. Every binding
/// for a given component shares the same instance; interface bindings are
/// additional names for it, never copies.
pub struct ComponentRegistry {
    components: Vec<ManagedComponent>,
    bindings: HashMap<String, Binding>,
}

impl std::fmt::Debug for ComponentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentRegistry")
            .field("components", &self.components.len())
            .field("bindings", &self.bindings.len())
            .finish()
    }
}

impl ComponentRegistry {
    /// Construct every definition whose source unit was discovered.
    ///
    /// Units without a definition are plain helper types and are skipped
    /// quietly. A constructor failure is logged and that component skipped;
    /// a binding-name collision is fatal.
    pub fn instantiate(
        units: &BTreeSet<String>,
        definitions: &'static [ComponentDefinition],
    ) -> Result<Self, RegistryError> {
        let mut registry = Self {
            components: Vec::new(),
            bindings: HashMap::new(),
        };

        for unit in units {
            let mut matched = false;
            for definition in definitions.iter().filter(|d| d.unit == unit.as_str()) {
                matched = true;
                match (definition.construct)() {
                    Ok(constructed) => registry.admit(definition, constructed)?,
                    Err(error) => {
                        tracing::error!(
                            unit = %unit,
                            component = definition.type_name,
                            error = %error,
                            "component construction failed; skipping"
                        );
                    }
                }
            }
            if !matched {
                tracing::trace!(unit = %unit, "no definition for unit; skipping");
            }
        }

        Ok(registry)
    }

    /// Run the injection pass over every managed component.
    ///
    /// This is a separate full pass after instantiation, so every singleton
    /// already exists when the first `wire` hook runs and dependency cycles
    /// resolve trivially.
    pub fn wire(&self) {
        for managed in &self.components {
            tracing::trace!(component = managed.definition.type_name, "wiring dependencies");
            managed.instance.wire(self);
        }
    }

    /// Resolve a dependency by its declared type.
    ///
    /// The binding name is derived from the type's simple name, which is how
    /// dependents reach a service through an abstraction:
    /// `resolve::<dyn UserDirectory>()` looks up `userDirectory`.
    pub fn resolve<T>(&self) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let key = naming::derive_key(naming::simple_name(std::any::type_name::<T>()));
        self.resolve_named(&key)
    }

    /// Resolve a binding by explicit name (the alias boundary).
    pub fn resolve_named<T>(&self, name: &str) -> Option<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.bindings
            .get(name)?
            .handle
            .downcast_ref::<Arc<T>>()
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// How the named binding came to exist, if it does.
    pub fn binding_kind(&self, name: &str) -> Option<BindingKind> {
        self.bindings.get(name).map(|binding| binding.kind)
    }

    /// Number of managed singletons (not bindings; a service exposing two
    /// interfaces is one component under three names).
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn binding_count(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    pub(crate) fn managed(&self) -> std::slice::Iter<'_, ManagedComponent> {
        self.components.iter()
    }

    fn admit(
        &mut self,
        definition: &'static ComponentDefinition,
        constructed: Constructed,
    ) -> Result<(), RegistryError> {
        let (name, kind) = match definition.role {
            Role::Controller => (naming::derive_key(definition.type_name), BindingKind::DerivedName),
            Role::Service { alias } => match alias {
                Some(alias) if !alias.trim().is_empty() => (alias.to_owned(), BindingKind::Alias),
                _ => (naming::derive_key(definition.type_name), BindingKind::DerivedName),
            },
        };
        self.bind(name, definition.type_name, kind, constructed.exposed_self)?;

        match definition.role {
            Role::Service { .. } => {
                for exposure in constructed.interfaces {
                    self.bind(
                        naming::derive_key(exposure.name),
                        definition.type_name,
                        BindingKind::Interface,
                        exposure.handle,
                    )?;
                }
            }
            Role::Controller => {
                if !constructed.interfaces.is_empty() {
                    tracing::warn!(
                        component = definition.type_name,
                        "interface exposures on a controller are not registered"
                    );
                }
            }
        }

        tracing::debug!(component = definition.type_name, "component registered");
        self.components.push(ManagedComponent {
            definition,
            instance: constructed.component,
        });
        Ok(())
    }

    fn bind(
        &mut self,
        name: String,
        owner: &'static str,
        kind: BindingKind,
        handle: Box<dyn Any + Send + Sync>,
    ) -> Result<(), RegistryError> {
        if let Some(existing) = self.bindings.get(&name) {
            return Err(RegistryError::DuplicateName {
                name,
                existing: existing.owner,
                incoming: owner,
            });
        }
        self.bindings.insert(name, Binding { owner, kind, handle });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::definition::BoxError;
    use std::sync::OnceLock;

    trait Greets: Send + Sync {
        fn greet(&self) -> String;
    }

    trait Counts: Send + Sync {
        fn count(&self) -> usize;
    }

    struct AlphaService;

    impl Greets for AlphaService {
        fn greet(&self) -> String {
            "hello".to_owned()
        }
    }

    impl Counts for AlphaService {
        fn count(&self) -> usize {
            1
        }
    }

    impl Component for AlphaService {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    struct BetaController {
        greeter: OnceLock<Arc<dyn Greets>>,
        missing: OnceLock<Arc<dyn Counts>>,
    }

    impl Component for BetaController {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
        fn wire(&self, registry: &ComponentRegistry) {
            if let Some(greeter) = registry.resolve::<dyn Greets>() {
                let _ = self.greeter.set(greeter);
            }
            if let Some(counter) = registry.resolve_named::<dyn Counts>("absentCounter") {
                let _ = self.missing.set(counter);
            }
        }
    }

    fn construct_alpha() -> Result<Constructed, BoxError> {
        Ok(Constructed::of(AlphaService)
            .exposing(|c| c as Arc<dyn Greets>)
            .exposing(|c| c as Arc<dyn Counts>)
            .build())
    }

    fn construct_beta() -> Result<Constructed, BoxError> {
        Ok(Constructed::of(BetaController {
            greeter: OnceLock::new(),
            missing: OnceLock::new(),
        })
        .build())
    }

    fn construct_failing() -> Result<Constructed, BoxError> {
        Err("backing store unavailable".into())
    }

    const ALPHA: ComponentDefinition = ComponentDefinition {
        unit: "fixture::alpha",
        type_name: "AlphaService",
        role: Role::Service { alias: None },
        construct: construct_alpha,
        routes: None,
    };

    const BETA: ComponentDefinition = ComponentDefinition {
        unit: "fixture::beta",
        type_name: "BetaController",
        role: Role::Controller,
        construct: construct_beta,
        routes: None,
    };

    const FAILING: ComponentDefinition = ComponentDefinition {
        unit: "fixture::broken",
        type_name: "BrokenService",
        role: Role::Service { alias: None },
        construct: construct_failing,
        routes: None,
    };

    const ALIASED: ComponentDefinition = ComponentDefinition {
        unit: "fixture::alpha",
        type_name: "AliasedService",
        role: Role::Service { alias: Some("prima") },
        construct: construct_plain_service,
        routes: None,
    };

    const BLANK_ALIAS: ComponentDefinition = ComponentDefinition {
        unit: "fixture::alpha",
        type_name: "BlankAliasService",
        role: Role::Service { alias: Some("   ") },
        construct: construct_plain_service,
        routes: None,
    };

    struct PlainService;

    impl Component for PlainService {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn construct_plain_service() -> Result<Constructed, BoxError> {
        Ok(Constructed::of(PlainService).build())
    }

    fn units(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| (*n).to_owned()).collect()
    }

    fn data_ptr<T: ?Sized>(arc: &Arc<T>) -> *const () {
        Arc::as_ptr(arc) as *const ()
    }

    #[test]
    fn controller_binds_under_derived_name_only() {
        static DEFS: [ComponentDefinition; 1] = [BETA];
        let registry =
            ComponentRegistry::instantiate(&units(&["fixture::beta"]), &DEFS).unwrap();

        assert!(registry.contains("betaController"));
        assert_eq!(registry.binding_kind("betaController"), Some(BindingKind::DerivedName));
        assert_eq!(registry.component_count(), 1);
        assert_eq!(registry.binding_count(), 1);
    }

    #[test]
    fn service_fans_out_to_every_interface() {
        static DEFS: [ComponentDefinition; 1] = [ALPHA];
        let registry =
            ComponentRegistry::instantiate(&units(&["fixture::alpha"]), &DEFS).unwrap();

        let own = registry.resolve::<AlphaService>().unwrap();
        let greets = registry.resolve::<dyn Greets>().unwrap();
        let counts = registry.resolve::<dyn Counts>().unwrap();

        assert_eq!(data_ptr(&own), data_ptr(&greets));
        assert_eq!(data_ptr(&own), data_ptr(&counts));
        assert_eq!(greets.greet(), "hello");
        assert_eq!(counts.count(), 1);
        assert_eq!(registry.binding_count(), 3);
        assert_eq!(registry.component_count(), 1);
        assert_eq!(registry.binding_kind("greets"), Some(BindingKind::Interface));
    }

    #[test]
    fn alias_takes_precedence_over_derived_name() {
        static DEFS: [ComponentDefinition; 1] = [ALIASED];
        let registry =
            ComponentRegistry::instantiate(&units(&["fixture::alpha"]), &DEFS).unwrap();

        assert!(registry.contains("prima"));
        assert!(!registry.contains("aliasedService"));
        assert_eq!(registry.binding_kind("prima"), Some(BindingKind::Alias));
    }

    #[test]
    fn blank_alias_falls_back_to_derived_name() {
        static DEFS: [ComponentDefinition; 1] = [BLANK_ALIAS];
        let registry =
            ComponentRegistry::instantiate(&units(&["fixture::alpha"]), &DEFS).unwrap();

        assert!(registry.contains("blankAliasService"));
        assert!(!registry.contains("   "));
    }

    #[test]
    fn construction_failure_skips_only_the_broken_component() {
        static DEFS: [ComponentDefinition; 3] = [FAILING, ALPHA, BETA];
        let registry = ComponentRegistry::instantiate(
            &units(&["fixture::alpha", "fixture::beta", "fixture::broken"]),
            &DEFS,
        )
        .unwrap();

        assert_eq!(registry.component_count(), 2);
        assert!(registry.contains("alphaService"));
        assert!(registry.contains("betaController"));
        assert!(!registry.contains("brokenService"));
    }

    #[test]
    fn unscanned_units_are_never_instantiated() {
        static DEFS: [ComponentDefinition; 2] = [ALPHA, BETA];
        let registry =
            ComponentRegistry::instantiate(&units(&["fixture::beta"]), &DEFS).unwrap();

        assert_eq!(registry.component_count(), 1);
        assert!(!registry.contains("alphaService"));
    }

    #[test]
    fn duplicate_binding_names_abort_initialization() {
        const FIRST: ComponentDefinition = ComponentDefinition {
            unit: "fixture::dup",
            type_name: "DupService",
            role: Role::Service { alias: Some("shared") },
            construct: construct_plain_service,
            routes: None,
        };
        const SECOND: ComponentDefinition = ComponentDefinition {
            unit: "fixture::dup",
            type_name: "OtherDupService",
            role: Role::Service { alias: Some("shared") },
            construct: construct_plain_service,
            routes: None,
        };
        static DEFS: [ComponentDefinition; 2] = [FIRST, SECOND];

        let error =
            ComponentRegistry::instantiate(&units(&["fixture::dup"]), &DEFS).unwrap_err();

        match error {
            RegistryError::DuplicateName { name, existing, incoming } => {
                assert_eq!(name, "shared");
                assert_eq!(existing, "DupService");
                assert_eq!(incoming, "OtherDupService");
            }
        }
    }

    #[test]
    fn wiring_injects_existing_bindings_and_skips_missing_ones() {
        static DEFS: [ComponentDefinition; 2] = [ALPHA, BETA];
        let registry = ComponentRegistry::instantiate(
            &units(&["fixture::alpha", "fixture::beta"]),
            &DEFS,
        )
        .unwrap();
        registry.wire();

        let controller = registry.resolve::<BetaController>().unwrap();
        assert_eq!(controller.greeter.get().unwrap().greet(), "hello");
        assert!(controller.missing.get().is_none());
    }
}
