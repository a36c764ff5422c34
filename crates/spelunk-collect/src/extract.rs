//! Registry walk: modules → components → raw dependency refs.
//!
//! Purely structural. Nothing is filtered here and nothing fails: entries
//! without a usable name come out with an empty name and are dropped later
//! by the filter.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use tracing::trace;

use spelunk_core::{ComponentDescriptor, ComponentRegistry, ModuleDescriptor};

/// A dependency as declared, before classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyRef {
    pub name: String,
    /// Resolves to a factory-provided entry.
    pub factory: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedComponent {
    pub name: String,
    pub dependencies: Vec<DependencyRef>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedModule {
    pub name: String,
    pub components: Vec<ExtractedComponent>,
}

/// Walk every registered module and collect its providers then controllers.
///
/// Modules sharing a name are merged into the first record, their
/// component lists concatenated in registry order.
pub fn extract<R>(registry: &R) -> Vec<ExtractedModule>
where
    R: ComponentRegistry + ?Sized,
{
    let descriptors = registry.list_modules();
    let factory_names = factory_names(&descriptors);

    // Indexed parallel collect keeps registry order.
    let extracted: Vec<ExtractedModule> = descriptors
        .par_iter()
        .map(|descriptor| extract_module(descriptor, &factory_names))
        .collect();

    let mut merged: Vec<ExtractedModule> = Vec::with_capacity(extracted.len());
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for module in extracted {
        match index_by_name.get(&module.name) {
            Some(&index) => {
                trace!(module = %module.name, "merging duplicate module");
                merged[index].components.extend(module.components);
            }
            None => {
                index_by_name.insert(module.name.clone(), merged.len());
                merged.push(module);
            }
        }
    }

    merged
}

/// Names of every factory-provided entry in the registry.
fn factory_names(descriptors: &[ModuleDescriptor]) -> HashSet<String> {
    descriptors
        .iter()
        .flat_map(|module| module.providers.iter().chain(module.controllers.iter()))
        .filter(|component| component.is_factory())
        .map(component_name)
        .filter(|name| !name.is_empty())
        .collect()
}

fn extract_module(descriptor: &ModuleDescriptor, factory_names: &HashSet<String>) -> ExtractedModule {
    let components = descriptor
        .providers
        .iter()
        .chain(descriptor.controllers.iter())
        .map(|component| extract_component(component, factory_names))
        .collect();

    ExtractedModule {
        name: descriptor.name.clone().unwrap_or_default(),
        components,
    }
}

fn extract_component(
    descriptor: &ComponentDescriptor,
    factory_names: &HashSet<String>,
) -> ExtractedComponent {
    // A plain reference to a factory-provided entry still counts as one.
    let dependencies = descriptor
        .constructor_deps
        .iter()
        .chain(descriptor.enhancer_deps.iter())
        .map(|dep| {
            let name = dep.name().to_string();
            let factory = dep.factory || factory_names.contains(&name);
            DependencyRef { name, factory }
        })
        .collect();

    ExtractedComponent {
        name: component_name(descriptor),
        dependencies,
    }
}

/// Display name of a registry entry.
///
/// Factory-provided entries, whether flagged or carrying the
/// [`FACTORY_MARKER`](spelunk_core::FACTORY_MARKER) type name, are named by
/// their export token (symbol description for symbolic tokens); everything
/// else by its type name.
pub fn component_name(descriptor: &ComponentDescriptor) -> String {
    let name = if descriptor.is_factory() {
        descriptor.token.as_ref().and_then(|token| token.description())
    } else {
        descriptor.type_name.as_deref()
    };
    name.unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spelunk_core::{DependencyDescriptor, Token};

    fn dep(name: &str) -> DependencyRef {
        DependencyRef {
            name: name.to_string(),
            factory: false,
        }
    }

    #[test]
    fn test_providers_before_controllers_and_ctor_before_enhancers() {
        let registry = vec![
            ModuleDescriptor::new("UsersModule")
                .with_controller(
                    ComponentDescriptor::of_type("UsersController")
                        .with_enhancer_dep(DependencyDescriptor::named("AuthGuard"))
                        .depends_on("UsersService"),
                )
                .with_provider(ComponentDescriptor::of_type("UsersService")),
        ];

        let modules = extract(&registry);
        assert_eq!(
            modules,
            vec![ExtractedModule {
                name: "UsersModule".to_string(),
                components: vec![
                    ExtractedComponent {
                        name: "UsersService".to_string(),
                        dependencies: vec![],
                    },
                    ExtractedComponent {
                        name: "UsersController".to_string(),
                        dependencies: vec![dep("UsersService"), dep("AuthGuard")],
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_duplicate_modules_are_merged() {
        let registry = vec![
            ModuleDescriptor::new("ConfigModule")
                .with_provider(ComponentDescriptor::of_type("ConfigService")),
            ModuleDescriptor::new("AppModule").with_provider(ComponentDescriptor::of_type("App")),
            ModuleDescriptor::new("ConfigModule")
                .with_provider(ComponentDescriptor::of_type("ConfigLoader")),
        ];

        let modules = extract(&registry);
        let names: Vec<&str> = modules.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["ConfigModule", "AppModule"]);

        let config: Vec<&str> = modules[0]
            .components
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(config, vec!["ConfigService", "ConfigLoader"]);
    }

    #[test]
    fn test_naming_rule() {
        let factory = ComponentDescriptor::from_factory(Token::named("REDIS_CLIENT"));
        let symbolic = ComponentDescriptor::from_factory(Token::symbol("CACHE_MANAGER"));
        let class = ComponentDescriptor::of_type("MailService");

        assert_eq!(component_name(&factory), "REDIS_CLIENT");
        assert_eq!(component_name(&symbolic), "CACHE_MANAGER");
        assert_eq!(component_name(&class), "MailService");
    }

    #[test]
    fn test_malformed_entries_get_empty_names() {
        let registry = vec![ModuleDescriptor {
            name: None,
            providers: vec![
                ComponentDescriptor::default(),
                ComponentDescriptor {
                    factory: true,
                    token: Some(Token::Symbol { symbol: None }),
                    ..ComponentDescriptor::default()
                },
            ],
            controllers: vec![
                ComponentDescriptor::of_type("Orphan")
                    .with_constructor_dep(DependencyDescriptor::default()),
            ],
        }];

        let modules = extract(&registry);
        assert_eq!(modules[0].name, "");
        assert_eq!(modules[0].components[0].name, "");
        assert_eq!(modules[0].components[1].name, "");
        assert_eq!(modules[0].components[2].dependencies, vec![dep("")]);
    }

    #[test]
    fn test_dependency_factory_marker_is_kept() {
        let registry = vec![ModuleDescriptor::new("DbModule").with_provider(
            ComponentDescriptor::of_type("Migrator")
                .with_constructor_dep(DependencyDescriptor::from_factory(Token::named("POOL"))),
        )];

        let modules = extract(&registry);
        assert_eq!(
            modules[0].components[0].dependencies,
            vec![DependencyRef {
                name: "POOL".to_string(),
                factory: true,
            }]
        );
    }

    #[test]
    fn test_factory_marker_type_name_names_by_token() {
        let marked = ComponentDescriptor {
            token: Some(Token::named("CACHE")),
            type_name: Some(spelunk_core::FACTORY_MARKER.to_string()),
            factory: false,
            ..ComponentDescriptor::default()
        };
        let symbolic = ComponentDescriptor {
            token: Some(Token::symbol("CLOCK")),
            type_name: Some("useFactory".to_string()),
            ..ComponentDescriptor::default()
        };

        assert_eq!(component_name(&marked), "CACHE");
        assert_eq!(component_name(&symbolic), "CLOCK");
    }

    #[test]
    fn test_plain_reference_to_marked_entry_is_factory() {
        let registry = vec![
            ModuleDescriptor::new("CacheModule").with_provider(ComponentDescriptor {
                token: Some(Token::named("CACHE")),
                type_name: Some("useFactory".to_string()),
                ..ComponentDescriptor::default()
            }),
            ModuleDescriptor::new("AppModule").with_provider(
                ComponentDescriptor::of_type("Svc")
                    .depends_on("CACHE")
                    .depends_on("Mailer"),
            ),
        ];

        let modules = extract(&registry);
        assert_eq!(modules[0].components[0].name, "CACHE");
        assert_eq!(
            modules[1].components[0].dependencies,
            vec![
                DependencyRef {
                    name: "CACHE".to_string(),
                    factory: true,
                },
                dep("Mailer"),
            ]
        );
    }
}
