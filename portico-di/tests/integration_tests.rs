//! Integration tests for the DI container

use portico_di::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// Test services
#[derive(Clone)]
struct Logger {
    name: String,
}

impl Logger {
    fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

struct Database {
    connection_string: String,
    logger: Arc<Logger>,
}

struct UserService {
    database: Arc<Database>,
    call_count: AtomicUsize,
}

impl UserService {
    fn get_user(&self, id: u64) -> String {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        format!("User {} from {}", id, self.database.connection_string)
    }
}

#[test]
fn test_singleton_registration() {
    let mut builder = ContainerBuilder::new();
    builder.register_singleton(|| Logger::new("test"));

    let container = builder.build();

    let logger1 = container.resolve_arc::<Logger>().unwrap();
    let logger2 = container.resolve_arc::<Logger>().unwrap();

    assert_eq!(logger1.name, "test");
    assert!(Arc::ptr_eq(&logger1, &logger2));
}

#[test]
fn test_transient_registration() {
    let counter = Arc::new(AtomicUsize::new(0));
    let counter_clone = counter.clone();

    let mut builder = ContainerBuilder::new();
    builder.register_transient(move || {
        let count = counter_clone.fetch_add(1, Ordering::Relaxed);
        Logger::new(&format!("logger-{}", count))
    });

    let container = builder.build();

    let logger1 = container.resolve::<Logger>().unwrap();
    let logger2 = container.resolve::<Logger>().unwrap();

    assert_eq!(logger1.name, "logger-0");
    assert_eq!(logger2.name, "logger-1");
}

#[test]
fn test_dependency_injection() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let mut builder = ContainerBuilder::new();
    builder.register_singleton(|| Logger::new("app"));
    builder
        .bind_singleton(|c: &Container| Database {
            connection_string: "postgres://localhost/test".to_string(),
            logger: c.resolve_arc::<Logger>().unwrap_or_else(|_| Arc::new(Logger::new("fallback"))),
        })
        .register();
    builder
        .try_bind(ServiceLifetime::Transient, |c: &Container| {
            Ok(UserService {
                database: c.resolve_arc::<Database>()?,
                call_count: AtomicUsize::new(0),
            })
        })
        .register();

    let container = builder.build();

    let service = container.resolve_arc::<UserService>().unwrap();
    assert_eq!(service.get_user(123), "User 123 from postgres://localhost/test");
    assert_eq!(service.call_count.load(Ordering::Relaxed), 1);
    assert_eq!(service.database.logger.name, "app");
}

#[test]
fn test_failing_dependency_propagates() {
    let mut builder = ContainerBuilder::new();
    builder
        .try_bind(ServiceLifetime::Transient, |c: &Container| {
            Ok(UserService {
                database: c.resolve_arc::<Database>()?,
                call_count: AtomicUsize::new(0),
            })
        })
        .register();

    let container = builder.build();

    match container.resolve_arc::<UserService>() {
        Err(DiError::ServiceNotFound { service_type, name }) => {
            assert!(service_type.ends_with("Database"));
            assert_eq!(name, None);
        }
        _ => panic!("Expected ServiceNotFound error"),
    }
}

#[test]
fn test_service_not_found() {
    let container = ContainerBuilder::new().build();

    let result = container.resolve::<Logger>();

    match result {
        Err(DiError::ServiceNotFound { .. }) => (),
        _ => panic!("Expected ServiceNotFound error"),
    }
}

#[test]
fn test_named_bindings_do_not_satisfy_unnamed_requests() {
    let mut builder = ContainerBuilder::new();
    builder.bind_singleton(|_| Logger::new("audit")).named("audit").register();

    let container = builder.build();

    assert!(container.resolve::<Logger>().is_err());
    assert_eq!(container.resolve_named::<Logger>("audit").unwrap().name, "audit");
    assert!(container.has_service::<Logger>());
}

#[test]
fn test_module_registration() {
    struct LoggingModule;

    impl Module for LoggingModule {
        fn configure(&self, builder: &mut ContainerBuilder) {
            builder.register_singleton(|| Logger::new("module"));
        }
    }

    let container = ContainerBuilder::new()
        .add_module(LoggingModule)
        .build();

    let logger = container.resolve::<Logger>().unwrap();
    assert_eq!(logger.name, "module");
}

#[test]
fn test_add_services() {
    let container = ContainerBuilder::new()
        .add_services(|builder| {
            builder.register_instance(Logger::new("instance"));
        })
        .build();

    let resolved = container.resolve::<Logger>().unwrap();
    assert_eq!(resolved.name, "instance");
}

#[test]
fn test_concurrent_singleton_resolution() {
    let mut builder = ContainerBuilder::new();
    builder.register_singleton(|| Logger::new("shared"));
    let container = builder.build();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let container = container.clone();
            std::thread::spawn(move || container.resolve_arc::<Logger>().unwrap())
        })
        .collect();

    let loggers: Vec<Arc<Logger>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let first = container.resolve_arc::<Logger>().unwrap();
    for logger in &loggers {
        assert!(Arc::ptr_eq(logger, &first));
    }
}
