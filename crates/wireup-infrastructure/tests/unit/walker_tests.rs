//! Dependency walker tests

use std::sync::Arc;
use wireup_domain::error::Result;
use wireup_domain::value_objects::Tags;
use wireup_infrastructure::di::{App, Node, ParamSet, Provider, Slot, Wiring, log_dependencies, walk};

pub struct Config;
pub struct Database;
pub struct Cache;
pub struct Route;
pub struct Logger;

wireup_infrastructure::params! {
    /// Shared dependencies
    pub struct Common {
        pub logger: Arc<Logger>,
    }
}

wireup_infrastructure::params! {
    /// Dependencies of a request handler
    pub struct Deps {
        pub config: Arc<Config>,
        /// Main database
        #[dep(name = "primary")]
        pub db: Arc<Database>,
        #[dep(optional)]
        pub cache: Option<Arc<Cache>>,
        #[dep(group = "routes")]
        pub routes: Vec<Arc<Route>>,
        #[dep(nested)]
        pub common: Common,
    }
}

struct Handler {
    deps: Deps,
}

fn new_handler(deps: Deps) -> Result<Handler> {
    Ok(Handler { deps })
}

fn deps(cache: Option<Arc<Cache>>) -> Deps {
    Deps {
        config: Arc::new(Config),
        db: Arc::new(Database),
        cache,
        routes: vec![Arc::new(Route)],
        common: Common {
            logger: Arc::new(Logger),
        },
    }
}

fn field_names(roots: &[Node<'_>]) -> Vec<&'static str> {
    let mut fields = Vec::new();
    walk(roots, |record| {
        fields.push(record.field.map(|meta| meta.field).unwrap_or("<naked>"));
        true
    });
    fields
}

#[test]
fn test_fields_in_declaration_order_with_nested_in_place() {
    let deps = deps(None);
    assert_eq!(
        field_names(&[Node::params(&deps)]),
        vec!["config", "db", "cache", "routes", "logger"]
    );
}

#[test]
fn test_record_metadata() {
    let deps = deps(None);
    let mut seen = Vec::new();
    walk(&[Node::params(&deps)], |record| {
        seen.push((
            record.owner.unwrap_or_default().to_string(),
            record.name().map(str::to_string),
            record.group().map(str::to_string),
            record.is_optional(),
        ));
        true
    });

    assert!(seen[0].0.ends_with("Deps"));
    assert_eq!(seen[1].1.as_deref(), Some("primary"));
    assert!(seen[2].3);
    assert_eq!(seen[3].2.as_deref(), Some("routes"));
    assert!(seen[4].0.ends_with("Common"));
}

#[test]
fn test_injected_reflects_presence_of_optional_values() {
    let absent = deps(None);
    let present = deps(Some(Arc::new(Cache)));

    let injected_cache = |set: &Deps| {
        let mut injected = None;
        walk(&[Node::params(set)], |record| {
            if record.field.map(|meta| meta.field) == Some("cache") {
                injected = Some(record.injected);
            }
            true
        });
        injected
    };

    assert_eq!(injected_cache(&absent), Some(false));
    assert_eq!(injected_cache(&present), Some(true));
}

#[test]
fn test_required_fields_are_always_injected() {
    let deps = deps(None);
    walk(&[Node::params(&deps)], |record| {
        if !record.is_optional() {
            assert!(record.injected);
        }
        true
    });
}

#[test]
fn test_visitor_can_stop_early() {
    let deps = deps(None);
    let mut visited = 0;
    let completed = walk(&[Node::params(&deps), Node::naked(&42u32)], |_| {
        visited += 1;
        visited < 2
    });

    assert!(!completed);
    assert_eq!(visited, 2);
}

#[test]
fn test_naked_roots() {
    let value = String::from("plain");
    let deps = deps(None);
    let mut records = Vec::new();
    let completed = walk(&[Node::naked(&value), Node::params(&deps)], |record| {
        records.push((record.is_naked(), record.type_name));
        true
    });

    assert!(completed);
    assert_eq!(records.len(), 6);
    assert!(records[0].0);
    assert!(records[0].1.contains("String"));
    assert!(records[1..].iter().all(|(naked, _)| !naked));
}

#[test]
fn test_naked_value_is_readable_through_any() {
    let value = 7u64;
    walk(&[Node::naked(&value)], |record| {
        assert_eq!(record.value.downcast_ref::<u64>(), Some(&7));
        true
    });
}

#[test]
fn test_slots_expose_nested_sets() {
    let deps = deps(None);
    let slots = deps.slots();

    assert_eq!(slots.len(), 5);
    assert!(matches!(slots[4], Slot::Nested(_)));
    assert!(deps.type_name().ends_with("Deps"));
}

#[test]
fn test_params_wired_by_container() {
    let app = App::new(Wiring::options([
        Wiring::supply(Config),
        Wiring::supply_named("primary", Database),
        Provider::supply(Route).group("routes").into(),
        Provider::supply(Route).group("routes").into(),
        Wiring::supply(Logger),
        Wiring::provide(new_handler),
    ]))
    .unwrap();

    let handler = app.get::<Handler>().unwrap();
    assert!(handler.deps.cache.is_none());
    assert_eq!(handler.deps.routes.len(), 2);

    let mut injected = Vec::new();
    walk(&[Node::params(&handler.deps)], |record| {
        injected.push(record.injected);
        true
    });
    assert_eq!(injected, vec![true, true, false, true, true]);
    log_dependencies(&[Node::params(&handler.deps)]);
}

#[test]
fn test_params_reject_whole_set_tags() {
    let app = App::new(
        Provider::new(new_handler).param_tags(Tags::new().name("primary").params()),
    )
    .unwrap();

    let err = app.get::<Handler>().err().unwrap();
    assert!(err.to_string().contains("tag its fields instead"));
}

pub struct Metrics;
pub struct Tracer;

wireup_infrastructure::params! {
    pub struct Telemetry {
        pub metrics: Arc<Metrics>,
        pub tracer: Arc<Tracer>,
    }
}

wireup_infrastructure::params! {
    pub struct Middle {
        #[dep(nested)]
        pub telemetry: Telemetry,
    }
}

wireup_infrastructure::params! {
    pub struct Outer {
        #[dep(nested)]
        pub middle: Middle,
    }
}

fn outer() -> Outer {
    Outer {
        middle: Middle {
            telemetry: Telemetry {
                metrics: Arc::new(Metrics),
                tracer: Arc::new(Tracer),
            },
        },
    }
}

#[test]
fn test_three_level_nesting_visits_each_leaf_once() {
    let outer = outer();
    assert_eq!(field_names(&[Node::params(&outer)]), vec!["metrics", "tracer"]);

    let mut visited = Vec::new();
    let completed = walk(&[Node::params(&outer)], |record| {
        visited.push(record.field.map(|meta| meta.field));
        false
    });
    assert!(!completed);
    assert_eq!(visited, vec![Some("metrics")]);
}
