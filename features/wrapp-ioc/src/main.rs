use std::sync::Arc;

use wrapp_ioc::{
    Constructible, Constructor, Container, Overrides, Parameter, Registration, ResolutionError,
};

fn main() {
    let container = Container::new();
    container.register(Registration::instance(Arc::new("localhost".to_string())));
    container.register(Registration::implementation::<Connection>().singleton());
    container.register(
        Registration::implementation_as::<dyn Repository, SqlRepository>(|it| it).named("sql"),
    );

    println!("{:?}", container);
    if let Err(errors) = container.validate() {
        println!("{errors}");
    }

    let repository = container.resolve_named::<dyn Repository>("sql").unwrap();
    println!("{}", repository.describe());

    let overrides = Overrides::new().with("table", TableName("orders".to_string()));
    let orders = container
        .resolve_with::<dyn Repository>(Some("sql"), &overrides)
        .unwrap();
    println!("{}", orders.describe());

    match container.resolve::<dyn Repository>() {
        Err(ResolutionError::UnregisteredAbstractType(key)) => println!("{key} is not registered"),
        other => println!("{:?}", other.map(|repository| repository.describe())),
    }
}

#[derive(Debug)]
struct Connection {
    host: Arc<String>,
}
impl Constructible for Connection {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(vec![Parameter::new::<String>("host")], |args| {
            Ok(Connection {
                host: args.get("host")?,
            })
        })]
    }
}

trait Repository: Send + Sync {
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
struct TableName(String);

struct SqlRepository {
    connection: Arc<Connection>,
    table: TableName,
}
impl Repository for SqlRepository {
    fn describe(&self) -> String {
        format!("table '{}' on {}", self.table.0, self.connection.host)
    }
}
impl Constructible for SqlRepository {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::new(
            vec![
                Parameter::concrete::<Connection>("connection"),
                Parameter::optional::<TableName>("table", TableName("users".to_string())),
            ],
            |args| {
                Ok(SqlRepository {
                    connection: args.get("connection")?,
                    table: args.value("table")?,
                })
            },
        )]
    }
}
