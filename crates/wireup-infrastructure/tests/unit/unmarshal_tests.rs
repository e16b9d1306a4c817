//! Decoding provider tests

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use wireup_domain::error::{Error, Result};
use wireup_domain::ports::{Event, EventLogger};
use wireup_infrastructure::config::{ConfigSource, DecodeOption, DecodeOptions};
use wireup_infrastructure::di::{
    App, Component, ConfigHandle, Provider, Prototype, Target, Wiring, decoding_constructor,
};
use wireup_infrastructure::infrastructure::{NopLogger, RecordingLogger};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Person {
    name: String,
    age: i64,
}

struct Greeting(String);

fn blank_person() -> Person {
    Person {
        name: String::new(),
        age: -1,
    }
}

fn new_greeting(person: Arc<Person>) -> Result<Greeting> {
    Ok(Greeting(format!("{} is {}", person.name, person.age)))
}

fn source(document: &str) -> Wiring {
    Wiring::supply(ConfigSource::from_toml_str(document))
}

fn nop_logger() -> Arc<dyn EventLogger> {
    Arc::new(NopLogger)
}

#[test]
fn test_unmarshal_provides_decoded_record() {
    let app = App::new(Wiring::options([
        source("name = \"svc\"\nage = 5\n"),
        Provider::unmarshal(blank_person(), DecodeOptions::new()).into(),
    ]))
    .unwrap();

    let person = app.get::<Person>().unwrap();
    assert_eq!(
        *person,
        Person {
            name: "svc".to_string(),
            age: 5
        }
    );
}

#[test]
fn test_decoded_record_feeds_other_constructors() {
    let app = App::new(Wiring::options([
        source("name = \"svc\"\nage = 5\n"),
        Provider::unmarshal(blank_person(), DecodeOptions::new()).into(),
        Wiring::provide(new_greeting),
    ]))
    .unwrap();

    assert_eq!(app.get::<Greeting>().unwrap().0, "svc is 5");
}

#[test]
fn test_unmarshal_key_keeps_prototype_values_for_missing_keys() {
    let app = App::new(Wiring::options([
        source("[greeter]\nname = \"hi\"\n"),
        Provider::unmarshal_key("greeter", blank_person(), DecodeOptions::new()).into(),
    ]))
    .unwrap();

    let person = app.get::<Person>().unwrap();
    assert_eq!(person.name, "hi");
    assert_eq!(person.age, -1);
}

#[test]
fn test_unmarshal_can_be_named() {
    let app = App::new(Wiring::options([
        source("[a]\nname = \"first\"\nage = 1\n[b]\nname = \"second\"\nage = 2\n"),
        Provider::unmarshal_key("a", blank_person(), DecodeOptions::new())
            .named("a")
            .into(),
        Provider::unmarshal_key("b", blank_person(), DecodeOptions::new())
            .named("b")
            .into(),
    ]))
    .unwrap();

    assert_eq!(app.get_named::<Person>(Some("a")).unwrap().name, "first");
    assert_eq!(app.get_named::<Person>(Some("b")).unwrap().name, "second");
}

#[test]
fn test_missing_source_is_missing_dependency() {
    let app = App::new(Provider::unmarshal(blank_person(), DecodeOptions::new())).unwrap();

    let err = app.get::<Person>().err().unwrap();
    assert!(matches!(err, Error::MissingDependency { .. }));
    assert!(err.to_string().contains("ConfigSource"));
}

#[test]
fn test_decode_failure_is_constructor_error() {
    let app = App::new(Wiring::options([
        source("name = \"svc\"\nage = \"old\"\n"),
        Provider::unmarshal(blank_person(), DecodeOptions::new()).into(),
    ]))
    .unwrap();

    let err = app.get::<Person>().err().unwrap();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_shared_record_is_one_handle() {
    let app = App::new(Wiring::options([
        source("name = \"svc\"\n"),
        Provider::<ConfigHandle<Person>>::unmarshal_shared(None, DecodeOptions::new()).into(),
    ]))
    .unwrap();

    let first = app.get::<ConfigHandle<Person>>().unwrap();
    let second = app.get::<ConfigHandle<Person>>().unwrap();

    // Fields the source omits start from the default, not from a prototype
    assert_eq!(first.get(), Person {
        name: "svc".to_string(),
        age: 0
    });
    first.update(|person| person.age = 40);
    assert_eq!(second.read(|person| person.age), 40);
    assert!(first.ptr_eq(&second));
}

#[test]
fn test_shared_record_from_prototype_key() {
    let app = App::new(Wiring::options([
        source("[greeter]\nage = 8\n"),
        Provider::<ConfigHandle<Person>>::unmarshal_key_shared(
            "greeter",
            Some(Person {
                name: "proto".to_string(),
                age: 0,
            }),
            DecodeOptions::new(),
        )
        .into(),
    ]))
    .unwrap();

    let handle = app.get::<ConfigHandle<Person>>().unwrap();
    assert_eq!(handle.get().name, "proto");
    assert_eq!(handle.get().age, 8);

    let previous = handle.replace(Person::default());
    assert_eq!(previous.age, 8);
    assert_eq!(handle.get(), Person::default());
}

#[test]
fn test_global_options_apply_before_local_ones() {
    let document = "name = \"svc\"\nage = 5\ncolor = \"blue\"\n";

    let strict = App::new(Wiring::options([
        source(document),
        Wiring::supply(DecodeOptions::from(DecodeOption::error_unused())),
        Provider::unmarshal(blank_person(), DecodeOptions::new()).into(),
    ]))
    .unwrap();
    let err = strict.get::<Person>().err().unwrap();
    assert!(err.to_string().contains("color"));

    let relaxed = App::new(Wiring::options([
        source(document),
        Wiring::supply(DecodeOptions::from(DecodeOption::error_unused())),
        Provider::unmarshal(
            blank_person(),
            DecodeOption::new(|config| config.error_unused = false).into(),
        )
        .into(),
    ]))
    .unwrap();
    assert_eq!(relaxed.get::<Person>().unwrap().age, 5);
}

#[test]
fn test_decoded_event_is_logged() {
    let recorder = Arc::new(RecordingLogger::new());
    let app = App::builder()
        .logger(recorder.clone())
        .wiring(source("[greeter]\nname = \"hi\"\nage = 1\n"))
        .wiring(Provider::unmarshal_key(
            "greeter",
            blank_person(),
            DecodeOptions::new(),
        ))
        .build()
        .unwrap();
    app.get::<Person>().unwrap();

    let decoded = recorder.events().into_iter().find_map(|event| match event {
        Event::Decoded {
            type_name,
            key,
            error,
        } => Some((type_name, key, error)),
        _ => None,
    });
    let (type_name, key, error) = decoded.unwrap();
    assert!(type_name.contains("Person"));
    assert_eq!(key.as_deref(), Some("greeter"));
    assert!(error.is_none());
}

#[test]
fn test_each_construction_gets_fresh_storage() {
    let constructor = decoding_constructor(
        Prototype::value(blank_person()),
        None,
        DecodeOptions::new(),
        Target::into_value,
    );

    let first = constructor(
        Arc::new(ConfigSource::from_toml_str("name = \"one\"\n")),
        None,
        nop_logger(),
    )
    .unwrap();
    let second = constructor(
        Arc::new(ConfigSource::from_toml_str("age = 2\n")),
        None,
        nop_logger(),
    )
    .unwrap();

    assert_eq!(first.name, "one");
    assert_eq!(first.age, -1);
    assert_eq!(second.name, "");
    assert_eq!(second.age, 2);
}

#[test]
fn test_pointer_prototype_is_never_modified() {
    let prototype = Prototype::pointer(blank_person());
    let constructor = decoding_constructor(
        prototype.clone(),
        None,
        DecodeOptions::new(),
        Target::into_component,
    );

    let component = constructor(
        Arc::new(ConfigSource::from_toml_str("name = \"changed\"\n")),
        None,
        nop_logger(),
    )
    .unwrap();

    match component {
        Component::Pointer(handle) => assert_eq!(handle.get().name, "changed"),
        Component::Value(_) => panic!("pointer prototype must produce a shared record"),
    }
    match prototype {
        Prototype::Pointer(value) => assert_eq!(*value, blank_person()),
        _ => panic!("prototype shape changed"),
    }
}

#[test]
fn test_prototype_shapes() {
    assert!(!Prototype::value(blank_person()).is_pointer());
    assert!(Prototype::pointer(blank_person()).is_pointer());

    let null = Prototype::<Person>::null();
    assert!(null.is_pointer());
    let mut target = null.resolve();
    assert!(target.is_pointer());
    assert_eq!(*target.destination(), Person::default());

    match Prototype::value(blank_person()).resolve().into_component() {
        Component::Value(person) => assert_eq!(person, blank_person()),
        Component::Pointer(_) => panic!("value prototype must produce a plain record"),
    }
}

#[test]
fn test_repeated_construction_yields_independent_records() {
    let constructor = decoding_constructor(
        Prototype::pointer(blank_person()),
        None,
        DecodeOptions::new(),
        Target::into_handle,
    );
    let source = Arc::new(ConfigSource::from_toml_str("name = \"svc\"\n"));

    let first = constructor(Arc::clone(&source), None, nop_logger()).unwrap();
    let second = constructor(source, None, nop_logger()).unwrap();

    assert!(!first.ptr_eq(&second));
    assert_eq!(first.get(), second.get());

    first.update(|person| person.age = 40);
    assert_eq!(second.get().age, -1);
}

#[test]
fn test_loaded_snapshot_survives_replacement() {
    let handle = ConfigHandle::new(blank_person());
    let other = handle.clone();

    let before = handle.load();
    let previous = other.replace(Person {
        name: "next".to_string(),
        age: 3,
    });

    assert!(Arc::ptr_eq(&before, &previous));
    assert_eq!(*before, blank_person());
    assert_eq!(handle.load().name, "next");

    handle.update(|person| person.age += 1);
    assert_eq!(other.get().age, 4);
    assert_eq!(before.age, -1);
}

#[test]
fn test_concurrent_updates_are_not_lost() {
    let handle = ConfigHandle::new(blank_person());

    std::thread::scope(|scope| {
        for _ in 0..4 {
            let handle = handle.clone();
            scope.spawn(move || {
                for _ in 0..100 {
                    handle.update(|person| person.age += 1);
                }
            });
        }
    });

    assert_eq!(handle.get().age, 399);
}
