//! Basic example of Dim autowiring.

use std::sync::Arc;

use dim::Injectable;
use dim::prelude::*;
use tracing::info;

// === Define your types ===

#[derive(Injectable)]
struct Config {
    #[dim(default = "default_url")]
    database_url: String,
    #[dim(default)]
    debug: bool,
}

fn default_url() -> String {
    "postgres://localhost/myapp".to_string()
}

#[derive(Injectable)]
struct Database {
    config: Arc<Config>,
}

impl Database {
    fn query(&self, sql: &str) -> String {
        info!(sql, "Executing");
        format!("Results from {}", self.config.database_url)
    }
}

#[derive(Injectable)]
#[dim(name = "Users")]
struct UserRepository {
    db: Arc<Database>,
    table: String,
}

impl UserRepository {
    fn find_user(&self, id: u64) -> String {
        self.db.query(&format!("SELECT * FROM {} WHERE id = {id}", self.table))
    }
}

fn main() -> Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::fmt()
        .with_env_filter("dim_container=debug,basic=info")
        .init();

    let container = Container::builder()
        // Config: one shared instance, built once
        .instance(
            "Config",
            ServiceDescriptor::new("Config", args! { "debug" => true })?.get(None, None)?,
        )
        // Database: a new one on every get, Config autowired
        .register(ServiceDescriptor::new("Database", None)?)
        .register(ServiceDescriptor::new("Users", args! { "table" => String::from("users") })?)
        .build();

    println!("✅ Container built: {container:?}");

    let config = container.resolve_arc::<Config>("Config")?;
    println!("📋 Config: database_url={}, debug={}", config.database_url, config.debug);

    let users = container.resolve_arc::<UserRepository>("Users")?;
    println!("👤 {}", users.find_user(42));

    // Call-time arguments override the descriptor's defaults
    let audit = ServiceDescriptor::new("Users", args! { "table" => String::from("users") })?
        .get(Some(&args! { "table" => String::from("audit_log") }), Some(&container))?;
    println!("🧾 {}", audit.cast_ref::<UserRepository>()?.find_user(7));

    // Any registered method or closure can be invoked the same way
    let registry = TypeRegistry::global();
    let greet = Function::new(Signature::new().param("name"), |args| {
        Ok(format!("Hello, {}!", args.arg::<&str>(0)?))
    });
    let greeting = Invoker::new(&registry).invoke(&greet.into(), &args! { "name" => "Dim" }, None)?;
    println!("👋 {}", greeting.cast::<String>()?);

    println!("\n🎉 Everything works!");
    Ok(())
}
