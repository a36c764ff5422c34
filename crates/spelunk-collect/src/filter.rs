//! The visible-graph filter.
//!
//! Four stages run in a fixed order, each a pure function over the module
//! list it is handed:
//!
//! 1. [`include_components`]: drop anonymous, ignored and self-named components
//! 2. [`prune_unreferenced`]: drop components that take part in no edge
//! 3. [`include_modules`]: base module test plus the focus neighborhood
//! 4. [`sort_modules`]: order modules by name
//!
//! Stage 3 looks at the lists produced by stage 2, so reordering the stages
//! changes the result.

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, trace};

use spelunk_core::Module;

use crate::options::FilterOptions;

/// Run the whole pipeline.
pub fn filter(modules: Vec<Module>, options: &FilterOptions) -> Vec<Module> {
    let focus = options.focus();

    let modules = include_components(modules, &options.ignore_components);
    let modules = prune_unreferenced(modules, focus, &options.ignore_modules);
    let modules = include_modules(modules, focus, &options.ignore_modules);
    sort_modules(modules)
}

/// Stage 1: per-module component inclusion.
///
/// A component is dropped when its name is empty, ignored, or equal to the
/// name of the module it lives in.
pub fn include_components(
    modules: Vec<Module>,
    ignore_components: &BTreeSet<String>,
) -> Vec<Module> {
    modules
        .into_iter()
        .map(|mut module| {
            let module_name = module.name.as_str();
            module.components.retain(|component| {
                !component.name.is_empty()
                    && !ignore_components.contains(&component.name)
                    && component.name != module_name
            });
            module
        })
        .collect()
}

/// Stage 2: cross-module pruning.
///
/// A component survives when it is the target of some edge, when it is the
/// source of an edge that lands on a component the view can show, or when
/// it is the focus target. Everything else is a free-standing node.
/// Components of ignored modules never count as an edge's landing point.
pub fn prune_unreferenced(
    modules: Vec<Module>,
    focus: Option<&str>,
    ignore_modules: &BTreeSet<String>,
) -> Vec<Module> {
    let present: HashSet<String> = modules
        .iter()
        .filter(|m| !ignore_modules.contains(&m.name))
        .flat_map(|m| m.components.iter().map(|c| c.name.clone()))
        .collect();
    let targets: HashSet<String> = modules
        .iter()
        .flat_map(|m| m.components.iter())
        .flat_map(|c| c.dependencies.iter().map(|e| e.target.clone()))
        .collect();

    modules
        .into_iter()
        .map(|mut module| {
            module.components.retain(|component| {
                let keep = targets.contains(&component.name)
                    || focus == Some(component.name.as_str())
                    || component
                        .dependencies
                        .iter()
                        .any(|edge| present.contains(&edge.target));
                if !keep {
                    trace!(module = %module.name, component = %component.name, "pruned");
                }
                keep
            });
            module
        })
        .collect()
}

/// Stage 3: module inclusion.
///
/// Without a focus only the base test applies. With a focus, a module that
/// passes the base test is kept when it holds the focus component, or when
/// one of its components is a direct dependency of the focus component. A
/// focus that matches nothing keeps no module at all.
pub fn include_modules(
    modules: Vec<Module>,
    focus: Option<&str>,
    ignore_modules: &BTreeSet<String>,
) -> Vec<Module> {
    let neighborhood = focus.and_then(|focus| focus_neighborhood(&modules, focus));
    if let Some(focus) = focus
        && neighborhood.is_none()
    {
        debug!(focus, "focus target not found in any module");
    }

    modules
        .into_iter()
        .filter(|module| {
            if !base_include(module, ignore_modules) {
                return false;
            }
            let Some(focus) = focus else {
                return true;
            };
            if module.contains(focus) {
                return true;
            }
            neighborhood.as_ref().is_some_and(|deps| {
                module
                    .components
                    .iter()
                    .any(|component| deps.contains(&component.name))
            })
        })
        .collect()
}

/// Stage 4: stable sort by module name.
pub fn sort_modules(mut modules: Vec<Module>) -> Vec<Module> {
    modules.sort_by(|a, b| a.name.cmp(&b.name));
    modules
}

fn base_include(module: &Module, ignore_modules: &BTreeSet<String>) -> bool {
    !module.name.is_empty()
        && !ignore_modules.contains(&module.name)
        && !module.components.is_empty()
}

/// Dependency targets of the focus component, taken from the first module
/// that owns it. `None` when no module owns it.
fn focus_neighborhood(modules: &[Module], focus: &str) -> Option<HashSet<String>> {
    modules
        .iter()
        .find_map(|module| module.component(focus))
        .map(|component| {
            component
                .dependencies
                .iter()
                .map(|edge| edge.target.clone())
                .collect()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use spelunk_core::{Component, Edge, EdgeKind};

    fn component(name: &str, deps: &[&str]) -> Component {
        deps.iter().fold(Component::new(name), |c, dep| {
            c.with_dependency(Edge::new(*dep, EdgeKind::Import))
        })
    }

    fn module(name: &str, components: Vec<Component>) -> Module {
        components
            .into_iter()
            .fold(Module::new(name), Module::with_component)
    }

    fn names(modules: &[Module]) -> Vec<(String, Vec<String>)> {
        modules
            .iter()
            .map(|m| {
                (
                    m.name.clone(),
                    m.components.iter().map(|c| c.name.clone()).collect(),
                )
            })
            .collect()
    }

    fn none() -> BTreeSet<String> {
        BTreeSet::new()
    }

    #[test]
    fn test_include_components_drops_noise() {
        let modules = vec![module(
            "CatsModule",
            vec![
                component("", &["CatsService"]),
                component("CatsModule", &["CatsService"]),
                component("ModuleRef", &[]),
                component("CatsService", &[]),
            ],
        )];
        let ignored = BTreeSet::from(["ModuleRef".to_string()]);

        let result = include_components(modules, &ignored);
        assert_eq!(
            names(&result),
            vec![("CatsModule".to_string(), vec!["CatsService".to_string()])]
        );
    }

    #[test]
    fn test_prune_keeps_sources_targets_and_focus() {
        let modules = vec![
            module("A", vec![component("Api", &["Db"]), component("Lonely", &[])]),
            module("B", vec![component("Db", &[]), component("Dangling", &["Nowhere"])]),
        ];

        let result = prune_unreferenced(modules.clone(), None, &none());
        assert_eq!(
            names(&result),
            vec![
                ("A".to_string(), vec!["Api".to_string()]),
                ("B".to_string(), vec!["Db".to_string()]),
            ]
        );

        let focused = prune_unreferenced(modules, Some("Lonely"), &none());
        assert_eq!(focused[0].components.len(), 2);
    }

    #[test]
    fn test_prune_ignores_edges_into_ignored_modules() {
        let modules = vec![
            module("Web", vec![component("Api", &["Metrics"])]),
            module("Health", vec![component("Metrics", &[])]),
        ];
        let ignored = BTreeSet::from(["Health".to_string()]);

        let result = prune_unreferenced(modules.clone(), None, &ignored);
        assert!(result[0].components.is_empty());

        let unignored = prune_unreferenced(modules, None, &none());
        assert_eq!(unignored[0].components.len(), 1);
    }

    #[test]
    fn test_include_modules_base_test() {
        let modules = vec![
            module("", vec![component("X", &[])]),
            module("Empty", vec![]),
            module("Ignored", vec![component("Y", &[])]),
            module("Kept", vec![component("Z", &[])]),
        ];
        let ignored = BTreeSet::from(["Ignored".to_string()]);

        let result = include_modules(modules, None, &ignored);
        assert_eq!(
            names(&result),
            vec![("Kept".to_string(), vec!["Z".to_string()])]
        );
    }

    #[test]
    fn test_focus_neighborhood_includes_direct_dependencies_only() {
        let modules = vec![
            module("Web", vec![component("Controller", &["Service"])]),
            module("Core", vec![component("Service", &["Store"])]),
            module("Data", vec![component("Store", &[])]),
        ];

        let result = include_modules(modules, Some("Service"), &none());
        let kept: Vec<&str> = result.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(kept, vec!["Core", "Data"]);
    }

    #[test]
    fn test_focus_module_is_kept_even_without_dependencies() {
        let modules = vec![
            module("Web", vec![component("Controller", &["Service"])]),
            module("Core", vec![component("Service", &[])]),
        ];

        let result = include_modules(modules, Some("Service"), &none());
        let kept: Vec<&str> = result.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(kept, vec!["Core"]);
    }

    #[test]
    fn test_unknown_focus_keeps_nothing() {
        let modules = vec![
            module("Web", vec![component("Controller", &["Service"])]),
            module("Core", vec![component("Service", &[])]),
        ];

        let result = include_modules(modules, Some("Ghost"), &none());
        assert!(result.is_empty());
    }

    #[test]
    fn test_ignored_module_stays_out_even_when_it_owns_the_focus() {
        let modules = vec![
            module("Core", vec![component("Service", &["Store"])]),
            module("Data", vec![component("Store", &[])]),
        ];
        let ignored = BTreeSet::from(["Core".to_string()]);

        let result = include_modules(modules, Some("Service"), &ignored);
        let kept: Vec<&str> = result.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(kept, vec!["Data"]);
    }

    #[test]
    fn test_sort_is_by_name_and_keeps_component_order() {
        let modules = vec![
            module("b", vec![component("b2", &[]), component("b1", &[])]),
            module("B", vec![component("B1", &[])]),
            module("a", vec![component("a1", &[])]),
        ];

        let sorted = sort_modules(modules);
        assert_eq!(
            names(&sorted),
            vec![
                ("B".to_string(), vec!["B1".to_string()]),
                ("a".to_string(), vec!["a1".to_string()]),
                ("b".to_string(), vec!["b2".to_string(), "b1".to_string()]),
            ]
        );
    }
}
