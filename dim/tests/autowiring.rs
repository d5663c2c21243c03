//! End-to-end autowiring through derived types, the global catalogue and
//! the reference container.

use std::sync::Arc;

use dim::Injectable;
use dim::prelude::*;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[derive(Injectable)]
struct Transport;

#[derive(Injectable)]
struct Mailer {
    transport: Arc<Transport>,
    #[dim(default = "default_sender")]
    sender: String,
    #[dim(default)]
    retries: u8,
}

fn default_sender() -> String {
    "noreply@localhost".to_string()
}

#[derive(Injectable)]
#[dim(name = "Newsletter")]
struct NewsletterService {
    mailer: Arc<Mailer>,
    #[dim(untyped)]
    subject: String,
}

#[derive(Injectable)]
struct Relay {
    #[dim(service = "PrimaryTransport")]
    transport: Arc<Transport>,
}

fn container() -> Container {
    Container::builder()
        .instance("Transport", Transport)
        .register(ServiceDescriptor::new("Mailer", None).unwrap())
        .register(
            ServiceDescriptor::new("Newsletter", args! { "subject" => String::from("Weekly") })
                .unwrap(),
        )
        .build()
}

#[test]
fn derived_types_are_in_the_global_catalogue() {
    let registry = TypeRegistry::global();
    assert!(registry.contains("Transport"));
    assert!(registry.contains("Mailer"));
    assert!(registry.contains("Newsletter"));
    assert!(!registry.contains("NewsletterService"));
    assert_eq!(<NewsletterService as Injectable>::TYPE_NAME, "Newsletter");
}

#[test]
fn autowiring_chain() {
    init_tracing();
    let container = container();

    let newsletter = container.resolve_arc::<NewsletterService>("Newsletter").unwrap();
    let transport = container.resolve_arc::<Transport>("Transport").unwrap();

    assert_eq!(newsletter.subject, "Weekly");
    assert_eq!(newsletter.mailer.sender, "noreply@localhost");
    assert!(Arc::ptr_eq(&newsletter.mailer.transport, &transport));
}

#[test]
fn services_build_fresh_instances() {
    init_tracing();
    let container = container();

    let a = container.resolve_arc::<Mailer>("Mailer").unwrap();
    let b = container.resolve_arc::<Mailer>("Mailer").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
    assert!(Arc::ptr_eq(&a.transport, &b.transport));
}

#[test]
fn call_time_arguments_override_defaults() {
    init_tracing();
    let container = container();
    let mailer = ServiceDescriptor::new("Mailer", args! { "retries" => 1u8 }).unwrap();

    let value = mailer.get(None, Some(&container)).unwrap();
    assert_eq!(value.cast_ref::<Mailer>().unwrap().retries, 1);

    let value = mailer
        .get(Some(&args! { "retries" => 5u8, 1 => String::from("ops@localhost") }), Some(&container))
        .unwrap();
    let built = value.cast_ref::<Mailer>().unwrap();
    assert_eq!(built.retries, 5);
    assert_eq!(built.sender, "ops@localhost");
}

#[test]
fn explicit_argument_wins_over_autowiring() {
    init_tracing();
    let container = container();
    let own = Arc::new(Transport);
    let mailer = ServiceDescriptor::new("Mailer", None).unwrap();

    let value = mailer
        .get(Some(&args! { "transport" => Arc::clone(&own) }), Some(&container))
        .unwrap();
    assert!(Arc::ptr_eq(&value.cast_ref::<Mailer>().unwrap().transport, &own));
}

#[test]
fn missing_dependency_without_container() {
    init_tracing();
    let mailer = ServiceDescriptor::new("Mailer", None).unwrap();

    match mailer.get(None, None).unwrap_err() {
        DimError::MissingArgument(err) => {
            assert_eq!(err.callable, "Mailer::__construct");
            assert_eq!(err.parameter, "transport");
            assert_eq!(err.declared_type.as_deref(), Some("Transport"));
        }
        other => panic!("Expected MissingArgument, got: {other:?}"),
    }
}

#[test]
fn unit_struct_ignores_arguments() {
    let value = Instantiator::new(&TypeRegistry::global())
        .instantiate("Transport", &args! { 0 => 1, "x" => 2 }, None)
        .unwrap();
    assert!(value.is::<Transport>());
}

#[test]
fn unknown_type_is_rejected_up_front() {
    match ServiceDescriptor::new("Maler", None).unwrap_err() {
        DimError::InvalidType(err) => {
            assert_eq!(err.type_name, "Maler");
            assert!(err.suggestions.contains(&"Mailer".to_string()));
        }
        other => panic!("Expected InvalidType, got: {other:?}"),
    }
}

#[test]
fn service_attribute_autowires_by_the_given_name() {
    init_tracing();
    let container = Container::builder()
        .instance("Transport", Transport)
        .instance("PrimaryTransport", Transport)
        .register(ServiceDescriptor::new("Relay", None).unwrap())
        .build();

    let relay = container.resolve_arc::<Relay>("Relay").unwrap();
    let primary = container.resolve_arc::<Transport>("PrimaryTransport").unwrap();
    let fallback = container.resolve_arc::<Transport>("Transport").unwrap();
    assert!(Arc::ptr_eq(&relay.transport, &primary));
    assert!(!Arc::ptr_eq(&relay.transport, &fallback));
}

#[test]
fn service_attribute_names_the_missing_dependency() {
    let container = Container::builder().instance("Transport", Transport).build();

    match ServiceDescriptor::new("Relay", None).unwrap().get(None, Some(&container)).unwrap_err() {
        DimError::MissingArgument(err) => {
            assert_eq!(err.parameter, "transport");
            assert_eq!(err.declared_type.as_deref(), Some("PrimaryTransport"));
        }
        other => panic!("Expected MissingArgument, got: {other:?}"),
    }
}

#[test]
fn builder_adds_a_derived_type() {
    let registry = Arc::new(TypeRegistry::builder().add::<Transport>().build());
    assert_eq!(registry.len(), 1);
    assert!(registry.contains(<Transport as Injectable>::TYPE_NAME));
    assert!(!registry.contains("Mailer"));

    let service = ServiceDescriptor::in_registry(Arc::clone(&registry), "Transport", None).unwrap();
    assert!(service.get(None, None).unwrap().is::<Transport>());
    assert_eq!(registry.type_of(&Value::new(Transport)).unwrap().name(), "Transport");
}
